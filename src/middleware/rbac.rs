// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{
    common::error::AppError,
    middleware::tenancy::TenantScope,
    models::rbac::Permission,
};

/// 1. O Trait que define o que é uma Permissão exigida pela rota
pub trait PermissionDef: Send + Sync + 'static {
    fn required() -> Permission;
}

/// 2. O Extractor (Guardião)
/// A checagem é uma função pura do papel resolvido no TenantScope —
/// o enum de papéis e a matriz em `models::rbac` são a única fonte de verdade.
pub struct RequirePermission<T>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequirePermission<T>
where
    T: PermissionDef,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let scope = parts
            .extensions
            .get::<TenantScope>()
            .ok_or(AppError::Unauthenticated)?;

        if !scope.role.has_permission(T::required()) {
            return Err(AppError::Forbidden);
        }

        Ok(RequirePermission(PhantomData))
    }
}

// ---
// DEFINIÇÃO DAS PERMISSÕES (TIPOS)
// ---

macro_rules! permission_def {
    ($name:ident => $perm:ident) => {
        pub struct $name;
        impl PermissionDef for $name {
            fn required() -> Permission {
                Permission::$perm
            }
        }
    };
}

permission_def!(PermDevicesRead => DevicesRead);
permission_def!(PermDevicesWrite => DevicesWrite);
permission_def!(PermDevicesScrap => DevicesScrap);
permission_def!(PermDevicesDelete => DevicesDelete);
permission_def!(PermDevicesTransfer => DevicesTransfer);
permission_def!(PermInspectionsWrite => InspectionsWrite);
permission_def!(PermRepairsWrite => RepairsWrite);
permission_def!(PermRepairsAssign => RepairsAssign);
permission_def!(PermShipmentsRead => ShipmentsRead);
permission_def!(PermShipmentsWrite => ShipmentsWrite);
permission_def!(PermSalesRead => SalesRead);
permission_def!(PermSalesWrite => SalesWrite);
permission_def!(PermFinanceRead => FinanceRead);
