//! Fixture user management.

use serde::Serialize;
use tracing::info;

use crate::{
    error::{Result, SuiteError},
    session::{Credentials, FormFields, Session},
};

const CREATE_USER_PATH: &str = "/system/userManager/user.create.html";
const PROFILE_EMAIL_DOMAIN: &str = "sakai.invalid";

/// Creates accounts through the service's user manager endpoint.
///
/// Creation needs administrative rights, so the borrowed session must be
/// acting as the administrator.
#[derive(Debug)]
pub struct UserManager<'a> {
    session: &'a Session,
    password: &'a str,
}

impl<'a> UserManager<'a> {
    /// Create users through `session`, all sharing `password`.
    #[must_use]
    pub fn new(session: &'a Session, password: &'a str) -> Self { Self { session, password } }

    /// Create `name` with a profile whose first and last names are the
    /// account name.
    ///
    /// # Errors
    ///
    /// See [`UserManager::create_user_with_profile`].
    pub async fn create_user(&self, name: &str) -> Result<Credentials> {
        self.create_user_with_profile(name, name, name).await
    }

    /// Create `name` with an explicit display name.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::Setup`] naming the user when the service answers
    /// with a status above 299 or the request cannot be made.
    pub async fn create_user_with_profile(
        &self,
        name: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<Credentials> {
        let what = format!("creating user {name}");
        let profile = ProfileImport::basic(name, first_name, last_name);
        let profile =
            serde_json::to_string(&profile).map_err(|err| SuiteError::setup(&what, err))?;
        let form = FormFields::new()
            .field(":name", name)
            .field("pwd", self.password)
            .field("pwdConfirm", self.password)
            .field(":sakai:profile-import", profile);

        let url = self.session.url_for(CREATE_USER_PATH)?;
        let response = self
            .session
            .post(&url, &form)
            .await
            .map_err(|err| SuiteError::setup(&what, err))?;
        if response.status() > 299 {
            return Err(SuiteError::setup(
                what,
                format!("service answered {}", response.status()),
            ));
        }
        info!(user = name, "created fixture user");
        Ok(Credentials::new(name, self.password))
    }
}

#[derive(Serialize)]
struct ProfileImport<'a> {
    basic: BasicProfile<'a>,
}

#[derive(Serialize)]
struct BasicProfile<'a> {
    elements: ProfileElements<'a>,
    access: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProfileElements<'a> {
    first_name: ProfileValue<'a>,
    last_name: ProfileValue<'a>,
    email: ProfileValue<'a>,
}

#[derive(Serialize)]
struct ProfileValue<'a> {
    value: std::borrow::Cow<'a, str>,
}

impl<'a> ProfileImport<'a> {
    fn basic(name: &str, first_name: &'a str, last_name: &'a str) -> Self {
        Self {
            basic: BasicProfile {
                elements: ProfileElements {
                    first_name: ProfileValue {
                        value: first_name.into(),
                    },
                    last_name: ProfileValue {
                        value: last_name.into(),
                    },
                    email: ProfileValue {
                        value: format!("{name}@{PROFILE_EMAIL_DOMAIN}").into(),
                    },
                },
                access: "everybody",
            },
        }
    }
}
