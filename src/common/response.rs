// src/common/response.rs

use serde::Serialize;

// Envelope padrão de sucesso: { "success": true, "data": ... }.
// O lado de erro ({ "success": false, "error": ... }) é montado pelo
// IntoResponse de AppError.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> axum::Json<Self> {
        axum::Json(Self { success: true, data })
    }
}
