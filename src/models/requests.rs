use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::{Answers, Identity};

/// Questionnaire submission, accepted as JSON or as an urlencoded form.
/// Field names follow the questionnaire form.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubmitRequest {
    #[validate(length(min = 1, max = 128))]
    #[serde(rename = "Name", alias = "name")]
    pub name: String,
    #[validate(length(max = 64))]
    #[serde(rename = "Phone", alias = "phone", default)]
    pub phone: String,
    #[validate(length(max = 64))]
    #[serde(rename = "Insta", alias = "insta", default)]
    pub insta: String,
    pub month: u8,
    pub day: u8,
    #[validate(length(min = 1, max = 32))]
    pub sex: String,
    #[validate(length(min = 1, max = 32))]
    pub sexorient: String,
    #[validate(length(min = 1, max = 32))]
    pub degree: String,
    #[validate(length(min = 1, max = 32))]
    pub sociability: String,
    #[validate(length(min = 1, max = 32))]
    pub acqmark: String,
}

impl SubmitRequest {
    pub fn into_parts(self) -> (Identity, Answers) {
        (
            Identity {
                name: self.name,
                phone: self.phone,
                insta: self.insta,
            },
            Answers {
                month: self.month,
                day: self.day,
                sex: self.sex,
                sexorient: self.sexorient,
                degree: self.degree,
                sociability: self.sociability,
                acqmark: self.acqmark,
            },
        )
    }
}
