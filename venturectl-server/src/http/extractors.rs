//! Custom Axum extractors

use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, Json, Path, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use venturectl_core::ValidationError;

use super::error::ApiError;

/// Extract and validate a numeric id from path
pub struct ValidId(pub i64);

impl<S> FromRequestParts<S> for ValidId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Validation(ValidationError::Empty { field: "id" }))?;

        let id = raw
            .parse::<i64>()
            .ok()
            .filter(|id| *id > 0)
            .ok_or(ApiError::Validation(ValidationError::InvalidValue {
                field: "id",
                value: raw,
            }))?;

        Ok(Self(id))
    }
}

/// JSON body whose decode failures are reported as 400 validation errors
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            ApiError::Validation(ValidationError::Malformed {
                what: "request body",
                detail: rejection.body_text(),
            })
        })?;
        Ok(Self(value))
    }
}

/// JSON body that may be absent.
///
/// An empty or all-whitespace body is `None`; anything else must decode as
/// `T`. The content type is not checked so bodiless clients still reach the
/// handler.
pub struct OptionalJson<T>(pub Option<T>);

impl<S, T> FromRequest<S> for OptionalJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let malformed = |detail: String| {
            ApiError::Validation(ValidationError::Malformed {
                what: "request body",
                detail,
            })
        };

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| malformed(rejection.body_text()))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(None));
        }

        serde_json::from_slice(&bytes)
            .map(|value| Self(Some(value)))
            .map_err(|err| malformed(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Secret {
        password: String,
    }

    async fn extract(body: &'static str) -> Result<OptionalJson<Secret>, ApiError> {
        let req = Request::builder().body(Body::from(body)).unwrap();
        OptionalJson::from_request(req, &()).await
    }

    #[tokio::test]
    async fn optional_json_treats_blank_body_as_absent() {
        assert!(extract("").await.unwrap().0.is_none());
        assert!(extract("  \n").await.unwrap().0.is_none());
    }

    #[tokio::test]
    async fn optional_json_decodes_without_content_type() {
        let OptionalJson(body) = extract(r#"{"password":"pw"}"#).await.unwrap();
        assert_eq!(body.unwrap().password, "pw");
    }

    #[tokio::test]
    async fn optional_json_rejects_garbage_as_validation() {
        assert!(matches!(
            extract("{nope").await,
            Err(ApiError::Validation(ValidationError::Malformed { .. }))
        ));
    }
}
