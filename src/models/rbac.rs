// src/models/rbac.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ---
// 1. Papéis (Roles)
// ---
// O papel é imutável durante a sessão e vem direto da linha do usuário.
// Toda decisão de autorização é uma função pura de (papel, empresa do ator,
// empresa do recurso) — nada de consulta ao banco no caminho quente.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    SuperAdmin,
    WarehouseManager,
    WarehouseStaff,
    RepairManager,
    Technician,
    BranchManager,
    SalesStaff,
}

// ---
// 2. Permissões
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    DevicesRead,
    DevicesWrite,
    DevicesScrap,
    DevicesDelete,
    DevicesTransfer,
    InspectionsWrite,
    RepairsWrite,
    RepairsAssign,
    ShipmentsRead,
    ShipmentsWrite,
    SalesRead,
    SalesWrite,
    FinanceRead,
    CompanyAdmin,
}

impl Role {
    /// A matriz de permissões inteira, num único lugar.
    pub fn has_permission(self, perm: Permission) -> bool {
        use Permission::*;
        match self {
            // Admin e SuperAdmin podem tudo (o escopo de empresa é resolvido
            // pelo TenantScope, não aqui).
            Role::Admin | Role::SuperAdmin => true,

            Role::WarehouseManager => matches!(
                perm,
                DevicesRead
                    | DevicesWrite
                    | DevicesScrap
                    | DevicesDelete
                    | DevicesTransfer
                    | InspectionsWrite
                    | ShipmentsRead
                    | ShipmentsWrite
            ),

            Role::WarehouseStaff => matches!(
                perm,
                DevicesRead | DevicesWrite | InspectionsWrite | ShipmentsRead
            ),

            Role::RepairManager => {
                matches!(perm, DevicesRead | RepairsWrite | RepairsAssign | InspectionsWrite)
            }

            Role::Technician => matches!(perm, DevicesRead | RepairsWrite | InspectionsWrite),

            Role::BranchManager => {
                matches!(perm, DevicesRead | DevicesTransfer | SalesRead | ShipmentsRead)
            }

            Role::SalesStaff => matches!(perm, DevicesRead | SalesRead | SalesWrite | FinanceRead),
        }
    }

    /// Papéis que podem receber um reparo atribuído.
    pub fn can_be_assigned_repairs(self) -> bool {
        matches!(self, Role::RepairManager | Role::Technician)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Permission::*;

    #[test]
    fn admin_has_every_permission() {
        for perm in [
            DevicesRead,
            DevicesWrite,
            DevicesScrap,
            DevicesDelete,
            DevicesTransfer,
            InspectionsWrite,
            RepairsWrite,
            RepairsAssign,
            ShipmentsRead,
            ShipmentsWrite,
            SalesRead,
            SalesWrite,
            FinanceRead,
            CompanyAdmin,
        ] {
            assert!(Role::Admin.has_permission(perm));
            assert!(Role::SuperAdmin.has_permission(perm));
        }
    }

    #[test]
    fn sales_staff_cannot_touch_warehouse() {
        assert!(Role::SalesStaff.has_permission(SalesWrite));
        assert!(Role::SalesStaff.has_permission(FinanceRead));
        assert!(!Role::SalesStaff.has_permission(DevicesWrite));
        assert!(!Role::SalesStaff.has_permission(DevicesScrap));
        assert!(!Role::SalesStaff.has_permission(InspectionsWrite));
    }

    #[test]
    fn technician_repairs_but_no_assignment() {
        assert!(Role::Technician.has_permission(RepairsWrite));
        assert!(!Role::Technician.has_permission(RepairsAssign));
        assert!(Role::RepairManager.has_permission(RepairsAssign));
    }

    #[test]
    fn warehouse_staff_cannot_scrap_or_delete() {
        assert!(Role::WarehouseStaff.has_permission(DevicesWrite));
        assert!(!Role::WarehouseStaff.has_permission(DevicesScrap));
        assert!(!Role::WarehouseStaff.has_permission(DevicesDelete));
        assert!(Role::WarehouseManager.has_permission(DevicesScrap));
    }

    #[test]
    fn only_repair_roles_receive_assignments() {
        assert!(Role::Technician.can_be_assigned_repairs());
        assert!(Role::RepairManager.can_be_assigned_repairs());
        assert!(!Role::Admin.can_be_assigned_repairs());
        assert!(!Role::SalesStaff.can_be_assigned_repairs());
        assert!(!Role::WarehouseStaff.can_be_assigned_repairs());
    }
}
