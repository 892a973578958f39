use serde::{Deserialize, Serialize};

/// What the user typed into the profile editor. Nothing here is validated;
/// `weight` in particular may hold any string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub age: Option<String>,
    pub gender: Option<String>,
    pub height: Option<String>,
    pub weight: Option<String>,
    pub activity: Option<String>,
}

/// The five raw form fields, as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileForm {
    pub age: String,
    pub gender: String,
    pub height: String,
    pub weight: String,
    pub activity: String,
}

impl ProfileForm {
    /// Sets a field by its form name. Returns false for unknown names.
    pub fn set(&mut self, field: &str, value: impl Into<String>) -> bool {
        let slot = match field {
            "age" => &mut self.age,
            "gender" => &mut self.gender,
            "height" => &mut self.height,
            "weight" => &mut self.weight,
            "activity" => &mut self.activity,
            _ => return false,
        };
        *slot = value.into();
        true
    }
}

impl From<ProfileForm> for UserProfile {
    // An empty field counts as unset.
    fn from(form: ProfileForm) -> Self {
        fn field(value: String) -> Option<String> {
            (!value.is_empty()).then_some(value)
        }

        Self {
            age: field(form.age),
            gender: field(form.gender),
            height: field(form.height),
            weight: field(form.weight),
            activity: field(form.activity),
        }
    }
}

impl From<&UserProfile> for ProfileForm {
    fn from(profile: &UserProfile) -> Self {
        let field = |value: &Option<String>| value.clone().unwrap_or_default();
        Self {
            age: field(&profile.age),
            gender: field(&profile.gender),
            height: field(&profile.height),
            weight: field(&profile.weight),
            activity: field(&profile.activity),
        }
    }
}

impl UserProfile {
    pub fn weight(&self) -> Option<&str> {
        self.weight.as_deref()
    }
}
