// User service
// Signed-in identity and settings for the user tab.

use serde::Serialize;

use crate::preferences::{Preferences, Settings, UserProfile};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserScreen {
    pub display_name: String,
    pub status_label: String,
    pub user: UserProfile,
    pub settings: Settings,
}

pub fn user_screen(prefs: &Preferences) -> UserScreen {
    let user = &prefs.user;
    let display_name = user
        .name
        .clone()
        .or_else(|| user.email.clone())
        .unwrap_or_else(|| "Guest".to_string());
    let status_label = if user.is_authenticated {
        "Signed in".to_string()
    } else {
        "Not signed in".to_string()
    };

    UserScreen {
        display_name,
        status_label,
        user: user.clone(),
        settings: prefs.settings.clone(),
    }
}
