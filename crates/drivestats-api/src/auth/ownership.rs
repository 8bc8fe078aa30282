/// Ownership checks for user-scoped resources
///
/// Vehicles and bug reports belong to one account. Stats and maintenance
/// logs belong to a vehicle, so their owner is the vehicle's owner. Every
/// refusal is written to the audit log.
use super::session::SessionUser;
use crate::audit::{audit_log, AuditEvent};
use crate::error::AppError;
use crate::store::{BugReport, Vehicle, VehicleStore};

/// A record owned by exactly one account
pub trait Owned {
    /// Id of the owning account
    fn owner_id(&self) -> i32;

    /// Short label for audit records, e.g. `vehicle:12`
    fn resource_label(&self) -> String;
}

impl Owned for Vehicle {
    fn owner_id(&self) -> i32 {
        self.user_id
    }

    fn resource_label(&self) -> String {
        format!("vehicle:{}", self.id)
    }
}

impl Owned for BugReport {
    fn owner_id(&self) -> i32 {
        self.user_id
    }

    fn resource_label(&self) -> String {
        format!("bug_report:{}", self.id)
    }
}

/// Fail with 403 unless `user` owns `resource`
pub fn ensure_owner<T: Owned>(user: &SessionUser, resource: &T) -> Result<(), AppError> {
    if resource.owner_id() == user.id {
        return Ok(());
    }

    audit_log(&AuditEvent::AccessDenied {
        user_id: user.id,
        resource: resource.resource_label(),
        ip_address: None,
    });

    Err(AppError::Forbidden(
        "You do not have permission to access this resource.".into(),
    ))
}

/// Load a vehicle and check that `user` owns it
///
/// 404 when the vehicle does not exist, 403 when it belongs to someone else.
pub async fn require_vehicle_owner(
    vehicles: &VehicleStore,
    user: &SessionUser,
    vehicle_id: i32,
) -> Result<Vehicle, AppError> {
    let vehicle = vehicles
        .get_by_id(vehicle_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Vehicle not found.".into()))?;

    ensure_owner(user, &vehicle)?;
    Ok(vehicle)
}
