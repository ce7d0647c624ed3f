use serde::{Deserialize, Serialize};

/// Country code every team is registered with
const TEAM_COUNTRY: &str = "CZ";

/// Domain used for generated user emails
const USER_EMAIL_DOMAIN: &str = "email.com";

/// Domain used for generated team emails
const TEAM_EMAIL_DOMAIN: &str = "copas.cz";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl UserRole {
    pub fn from_admin_flag(is_admin: bool) -> Self {
        if is_admin {
            UserRole::Admin
        } else {
            UserRole::User
        }
    }
}

/// Body of `POST /users`. Email and password are derived from the name.
#[derive(Debug, Clone, Serialize)]
pub struct UserPayload {
    pub banned: bool,
    pub email: String,
    pub fields: Vec<serde_json::Value>,
    pub hidden: bool,
    pub name: String,
    pub password: String,
    #[serde(rename = "type")]
    pub role: UserRole,
    pub verified: bool,
}

impl UserPayload {
    pub fn new(name: &str, role: UserRole) -> Self {
        Self {
            banned: false,
            email: format!("{}@{}", name, USER_EMAIL_DOMAIN),
            fields: Vec::new(),
            hidden: false,
            name: name.to_string(),
            password: name.to_string(),
            role,
            verified: true,
        }
    }
}

/// Body of `POST /teams`.
#[derive(Debug, Clone, Serialize)]
pub struct TeamPayload {
    pub banned: bool,
    pub country: String,
    pub email: String,
    pub fields: Vec<serde_json::Value>,
    pub hidden: bool,
    pub name: String,
    pub password: String,
}

impl TeamPayload {
    pub fn new(name: &str) -> Self {
        Self {
            banned: false,
            country: TEAM_COUNTRY.to_string(),
            email: format!("{}@{}", name, TEAM_EMAIL_DOMAIN),
            fields: Vec::new(),
            hidden: false,
            name: name.to_string(),
            password: name.to_string(),
        }
    }
}

/// Body of `POST` and `DELETE /teams/{id}/members`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MemberPayload {
    pub user_id: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeState {
    #[default]
    Visible,
    Hidden,
}

/// A challenge to create; also the body of `POST /challenges`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewChallenge {
    pub category: String,
    pub description: String,
    pub state: ChallengeState,
    pub name: String,
    #[serde(rename = "type")]
    pub challenge_type: String,
    pub value: i64,
}

impl NewChallenge {
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        Self {
            category: String::new(),
            description: String::new(),
            state: ChallengeState::Visible,
            name: name.into(),
            challenge_type: "standard".to_string(),
            value,
        }
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn state(mut self, state: ChallengeState) -> Self {
        self.state = state;
        self
    }

    pub fn challenge_type(mut self, challenge_type: impl Into<String>) -> Self {
        self.challenge_type = challenge_type.into();
        self
    }
}

/// Matching options shared by flag creation and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagOptions {
    /// CTFd's `data` field: `case_insensitive`, or empty for exact matching
    pub data: String,
    pub flag_type: String,
}

impl Default for FlagOptions {
    fn default() -> Self {
        Self {
            data: "case_insensitive".to_string(),
            flag_type: "static".to_string(),
        }
    }
}

/// Body of `POST /flags`.
#[derive(Debug, Clone, Serialize)]
pub struct FlagPayload {
    pub challenge_id: i64,
    pub content: String,
    pub data: String,
    #[serde(rename = "type")]
    pub flag_type: String,
}

impl FlagPayload {
    pub fn new(challenge_id: i64, content: &str, options: &FlagOptions) -> Self {
        Self {
            challenge_id,
            content: content.to_string(),
            data: options.data.clone(),
            flag_type: options.flag_type.clone(),
        }
    }
}

/// Body of `PATCH /flags/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct FlagUpdatePayload {
    pub content: String,
    pub data: String,
    #[serde(rename = "type")]
    pub flag_type: String,
    pub id: i64,
}

impl FlagUpdatePayload {
    pub fn new(id: i64, content: &str, options: &FlagOptions) -> Self {
        Self {
            content: content.to_string(),
            data: options.data.clone(),
            flag_type: options.flag_type.clone(),
            id,
        }
    }
}

/// Envelope of a successful create: `{"data": {"id": ..., ...}}`.
/// Everything besides the id is ignored.
#[derive(Debug, Deserialize)]
pub struct CreatedResponse {
    pub data: CreatedData,
}

#[derive(Debug, Deserialize)]
pub struct CreatedData {
    pub id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_payload_derives_credentials() {
        let body = serde_json::to_value(UserPayload::new("alice", UserRole::Admin)).unwrap();
        assert_eq!(
            body,
            json!({
                "banned": false,
                "email": "alice@email.com",
                "fields": [],
                "hidden": false,
                "name": "alice",
                "password": "alice",
                "type": "admin",
                "verified": true,
            })
        );
    }

    #[test]
    fn test_team_payload() {
        let body = serde_json::to_value(TeamPayload::new("red")).unwrap();
        assert_eq!(body["country"], "CZ");
        assert_eq!(body["email"], "red@copas.cz");
        assert_eq!(body["password"], "red");
    }

    #[test]
    fn test_challenge_defaults() {
        let body = serde_json::to_value(NewChallenge::new("warmup", 5)).unwrap();
        assert_eq!(
            body,
            json!({
                "category": "",
                "description": "",
                "state": "visible",
                "name": "warmup",
                "type": "standard",
                "value": 5,
            })
        );
    }

    #[test]
    fn test_challenge_builder() {
        let challenge = NewChallenge::new("rop", 500)
            .category("pwn")
            .state(ChallengeState::Hidden)
            .challenge_type("dynamic");
        let body = serde_json::to_value(&challenge).unwrap();
        assert_eq!(body["category"], "pwn");
        assert_eq!(body["state"], "hidden");
        assert_eq!(body["type"], "dynamic");
    }

    #[test]
    fn test_flag_payloads_use_default_options() {
        let options = FlagOptions::default();
        let create = serde_json::to_value(FlagPayload::new(4, "CTF{x}", &options)).unwrap();
        assert_eq!(
            create,
            json!({
                "challenge_id": 4,
                "content": "CTF{x}",
                "data": "case_insensitive",
                "type": "static"
            })
        );

        let update = serde_json::to_value(FlagUpdatePayload::new(9, "CTF{y}", &options)).unwrap();
        assert_eq!(update["id"], 9);
        assert_eq!(update["content"], "CTF{y}");
    }

    #[test]
    fn test_created_response_ignores_extra_fields() {
        let body = r#"{"success": true, "data": {"id": 7, "name": "alice"}}"#;
        let resp: CreatedResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.data.id, 7);
    }
}
