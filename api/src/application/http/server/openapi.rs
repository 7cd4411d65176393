use crate::application::http::{
    chat::router::ChatApiDoc, health::router::HealthApiDoc, identity::router::IdentityApiDoc,
    localization::router::LocalizationApiDoc, medication::router::MedicationApiDoc,
    preferences::router::PreferencesApiDoc,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "KurdMed API"
    ),
    nest(
        (path = "/health", api = HealthApiDoc),
        (path = "/locales", api = LocalizationApiDoc),
        (path = "/auth", api = IdentityApiDoc),
        (path = "/preferences", api = PreferencesApiDoc),
        (path = "/medications", api = MedicationApiDoc),
        (path = "/chat", api = ChatApiDoc),
    )
)]
pub struct ApiDoc;
