//! Role-based permission table.
//!
//! Each permission maps to the set of roles allowed to use it; super_admin
//! short-circuits every check. The table is consulted at call time against
//! the current session role, never persisted.

use crate::models::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    UserManage,
    BugCreate,
    BugDelete,
    BugEdit,
    BugStatus,
    BugAssign,
}

impl Permission {
    /// Resolve the string form used by UI callers; unknown names map to
    /// nothing and therefore deny.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "user:manage" => Some(Permission::UserManage),
            "bug:create" => Some(Permission::BugCreate),
            "bug:delete" => Some(Permission::BugDelete),
            "bug:edit" => Some(Permission::BugEdit),
            "bug:status" => Some(Permission::BugStatus),
            "bug:assign" => Some(Permission::BugAssign),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Permission::UserManage => "user:manage",
            Permission::BugCreate => "bug:create",
            Permission::BugDelete => "bug:delete",
            Permission::BugEdit => "bug:edit",
            Permission::BugStatus => "bug:status",
            Permission::BugAssign => "bug:assign",
        }
    }

    /// Roles granted this permission, super_admin excluded (it is handled by
    /// the short-circuit in [`role_allows`]).
    fn allowed_roles(self) -> &'static [Role] {
        match self {
            Permission::UserManage => &[],
            Permission::BugCreate => &[Role::Admin, Role::Tester],
            Permission::BugDelete => &[],
            Permission::BugEdit => &[Role::Tester],
            Permission::BugStatus => &[Role::Developer],
            Permission::BugAssign => &[Role::Admin],
        }
    }
}

pub fn role_allows(role: Role, permission: Permission) -> bool {
    if role == Role::SuperAdmin {
        return true;
    }
    permission.allowed_roles().contains(&role)
}
