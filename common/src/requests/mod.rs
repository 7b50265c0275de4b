use serde::Deserialize;

/// Text fields accepted by the create and update endpoints.
///
/// Every field is optional at this level; create enforces `school` and
/// `uniformCombo`, update overlays whichever fields are present.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniformFields {
    pub school: Option<String>,
    pub school_type: Option<String>,
    pub uniform_combo: Option<String>,
    pub compound_wear: Option<String>,
    pub church_wear: Option<String>,
}

impl UniformFields {
    /// Records a multipart text field. Returns `false` for names that are not uniform fields.
    pub fn set(&mut self, name: &str, value: String) -> bool {
        let target = match name {
            "school" => &mut self.school,
            "schoolType" => &mut self.school_type,
            "uniformCombo" => &mut self.uniform_combo,
            "compoundWear" => &mut self.compound_wear,
            "churchWear" => &mut self.church_wear,
            _ => return false,
        };
        *target = Some(value);
        true
    }
}
