use axum::{
    Extension,
    extract::{Multipart, State, multipart::MultipartError},
    http::StatusCode,
};
use kurdmed_core::domain::{
    localization::Language,
    medication::{IdentifyByImageInput, ImagePayload, ports::MedicationService},
};

use crate::application::{
    device_middleware::DeviceContext,
    http::{
        medication::{
            handlers::identify_by_name::IdentifyMedicationResponse,
            validators::{IdentifyByImageForm, MAX_IMAGE_SIZE},
        },
        server::{
            api_entities::{api_error::ApiError, response::Response},
            app_state::AppState,
        },
    },
};

struct UploadedImage {
    mime_type: String,
    data: Vec<u8>,
}

#[derive(Default)]
struct ImageForm {
    image: Option<UploadedImage>,
    prompt: Option<String>,
    language: Option<Language>,
}

enum FormError {
    TooLarge,
    InvalidType,
    Malformed(String),
}

fn read_error(e: MultipartError) -> FormError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        FormError::TooLarge
    } else {
        FormError::Malformed(format!("Failed to read multipart field: {}", e.body_text()))
    }
}

async fn read_form(multipart: &mut Multipart) -> Result<ImageForm, FormError> {
    let mut form = ImageForm::default();

    while let Some(field) = multipart.next_field().await.map_err(read_error)? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "image" => {
                let mime_type = field.content_type().unwrap_or("").to_string();
                if !mime_type.starts_with("image/") {
                    return Err(FormError::InvalidType);
                }

                let data = field.bytes().await.map_err(read_error)?;
                if data.len() > MAX_IMAGE_SIZE {
                    return Err(FormError::TooLarge);
                }

                form.image = Some(UploadedImage {
                    mime_type,
                    data: data.to_vec(),
                });
            }
            "prompt" => {
                let value = field.text().await.map_err(read_error)?;
                form.prompt = Some(value).filter(|p| !p.trim().is_empty());
            }
            "language" => {
                let value = field.text().await.map_err(read_error)?;
                let language = value
                    .trim()
                    .parse()
                    .map_err(|_| FormError::Malformed(format!("Unknown language '{}'", value)))?;
                form.language = Some(language);
            }
            _ => {}
        }
    }

    Ok(form)
}

#[utoipa::path(
    post,
    path = "/identify/image",
    tag = "medications",
    summary = "Identify a medication from a packaging photo",
    description = "Sends the photo to the model and returns the parsed medication record. Model failures are returned as a record whose outcome explains them.",
    params(
        ("X-Device-Id" = String, Header, description = "Device identifier"),
    ),
    request_body(content = IdentifyByImageForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, body = IdentifyMedicationResponse),
        (status = 400, description = "Missing, oversized or non-image upload"),
        (status = 401, description = "Not signed in")
    )
)]
pub async fn identify_by_image(
    State(state): State<AppState>,
    Extension(device): Extension<DeviceContext>,
    mut multipart: Multipart,
) -> Result<Response<IdentifyMedicationResponse>, ApiError> {
    let form = read_form(&mut multipart).await;
    let explicit = form.as_ref().ok().and_then(|form| form.language);
    let language = state.resolve_language(&device, explicit).await;

    let form = form.map_err(|e| {
        ApiError::BadRequest(match e {
            FormError::TooLarge => {
                let size = (MAX_IMAGE_SIZE / (1024 * 1024)).to_string();
                state.translator.translate_with(
                    language,
                    "imageIdentifier.error.tooLarge",
                    &[("size", size.as_str())],
                )
            }
            FormError::InvalidType => state.translate(language, "imageIdentifier.error.invalidType"),
            FormError::Malformed(message) => message,
        })
    })?;

    let image = form.image.ok_or_else(|| {
        ApiError::BadRequest(state.translate(language, "imageIdentifier.error.selectImage"))
    })?;

    let prompt = form
        .prompt
        .unwrap_or_else(|| state.translate(language, "packagingScanner.prompt"));

    let record = state
        .service
        .identify_by_image(IdentifyByImageInput {
            image: ImagePayload::from_bytes(&image.data, image.mime_type),
            prompt,
            language,
        })
        .await;

    Ok(Response::OK(IdentifyMedicationResponse { data: record }))
}
