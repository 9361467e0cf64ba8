use actix_web::{dev::ServiceRequest, web, Error, HttpMessage};
use actix_web_httpauth::extractors::bearer::{BearerAuth, Config};
use actix_web_httpauth::extractors::AuthenticationError;

use crate::api::state::ApiState;

/// Sesión validada, disponible en las extensiones de la petición.
#[derive(Clone)]
pub struct SessionInfo {
    pub token: String,
}

/// Valida el token de sesión y extiende su expiración.
pub async fn validator(
    req: ServiceRequest,
    credentials: BearerAuth,
) -> Result<ServiceRequest, (Error, ServiceRequest)> {
    let token = credentials.token().to_string();

    let Some(state) = req.app_data::<web::Data<ApiState>>().cloned() else {
        return Err((unauthorized(), req));
    };

    match state.auth().touch(&token).await {
        Ok(true) => {
            req.extensions_mut().insert(SessionInfo { token });
            Ok(req)
        }
        Ok(false) => Err((unauthorized(), req)),
        Err(e) => {
            tracing::error!("No se pudo validar la sesión: {}", e);
            Err((actix_web::error::ErrorInternalServerError("session store unavailable"), req))
        }
    }
}

fn unauthorized() -> Error {
    AuthenticationError::from(Config::default()).into()
}
