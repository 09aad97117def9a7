use serde::{Deserialize, Serialize};

/// One synthetic doctor, as written to the dataset JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorProfile {
    pub doctor_id: String,
    pub name: String,
    pub primary_specialty: String,
    pub sub_specialty: String,
    pub location: String,
    pub hospital_affiliation: String,
    pub years_of_experience: u32,
    pub language_fluency: Vec<String>,
    pub critical_surgeries_summary: String,
    pub special_interests_and_expertise: String,
}

/// Flattened scalar view of a profile stored next to its vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorMetadata {
    pub doctor_id: String,
    pub name: String,
    pub primary_specialty: String,
    pub sub_specialty: String,
    pub location: String,
    pub hospital_affiliation: String,
    pub years_of_experience: u32,
    pub languages: String,
    pub language_count: u32,
    pub surgeries_summary: String,
    pub expertise: String,
}

impl DoctorProfile {
    /// Text fed to the embedding model.
    ///
    /// Field order and separators must not change: stored vectors were
    /// computed from exactly this string.
    pub fn embedding_text(&self) -> String {
        [
            format!("{} specialist", self.primary_specialty),
            format!("subspecialty in {}", self.sub_specialty),
            format!("practicing at {}", self.hospital_affiliation),
            format!("located in {}", self.location),
            format!("with {} years of experience", self.years_of_experience),
            format!("Languages: {}", self.language_fluency.join(", ")),
            self.critical_surgeries_summary.clone(),
            self.special_interests_and_expertise.clone(),
        ]
        .join(" ")
    }

    pub fn metadata(&self) -> DoctorMetadata {
        DoctorMetadata {
            doctor_id: self.doctor_id.clone(),
            name: self.name.clone(),
            primary_specialty: self.primary_specialty.clone(),
            sub_specialty: self.sub_specialty.clone(),
            location: self.location.clone(),
            hospital_affiliation: self.hospital_affiliation.clone(),
            years_of_experience: self.years_of_experience,
            languages: self.language_fluency.join(", "),
            language_count: self.language_fluency.len() as u32,
            surgeries_summary: self.critical_surgeries_summary.clone(),
            expertise: self.special_interests_and_expertise.clone(),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn cardiologist() -> DoctorProfile {
        DoctorProfile {
            doctor_id: "DOC-00001".to_string(),
            name: "Dr. Jane Smith".to_string(),
            primary_specialty: "Cardiology".to_string(),
            sub_specialty: "Electrophysiology".to_string(),
            location: "Boston, MA".to_string(),
            hospital_affiliation: "Massachusetts General Hospital".to_string(),
            years_of_experience: 17,
            language_fluency: vec!["English".to_string(), "French".to_string()],
            critical_surgeries_summary: "Dr. Smith has performed 400+ ablations.".to_string(),
            special_interests_and_expertise: "Atrial fibrillation research.".to_string(),
        }
    }

    #[test]
    fn test_embedding_text_has_fixed_layout() {
        let text = cardiologist().embedding_text();
        assert_eq!(
            text,
            "Cardiology specialist subspecialty in Electrophysiology \
             practicing at Massachusetts General Hospital located in Boston, MA \
             with 17 years of experience Languages: English, French \
             Dr. Smith has performed 400+ ablations. Atrial fibrillation research."
        );
    }

    #[test]
    fn test_embedding_text_contains_every_field() {
        let profile = cardiologist();
        let text = profile.embedding_text();
        for value in [
            &profile.primary_specialty,
            &profile.sub_specialty,
            &profile.location,
            &profile.hospital_affiliation,
            &profile.critical_surgeries_summary,
            &profile.special_interests_and_expertise,
        ] {
            assert!(text.contains(value.as_str()), "missing {value}");
        }
        assert!(text.contains("17"));
        for language in &profile.language_fluency {
            assert!(text.contains(language.as_str()));
        }
    }

    #[test]
    fn test_metadata_flattens_languages() {
        let meta = cardiologist().metadata();
        assert_eq!(meta.languages, "English, French");
        assert_eq!(meta.language_count, 2);
        assert_eq!(meta.surgeries_summary, "Dr. Smith has performed 400+ ablations.");
        assert_eq!(meta.expertise, "Atrial fibrillation research.");
    }

    #[test]
    fn test_profile_json_field_names() {
        let json = serde_json::to_value(cardiologist()).unwrap();
        let obj = json.as_object().unwrap();
        for key in [
            "doctor_id",
            "name",
            "primary_specialty",
            "sub_specialty",
            "location",
            "hospital_affiliation",
            "years_of_experience",
            "language_fluency",
            "critical_surgeries_summary",
            "special_interests_and_expertise",
        ] {
            assert!(obj.contains_key(key), "missing key {key}");
        }
        assert_eq!(obj.len(), 10);
    }
}
