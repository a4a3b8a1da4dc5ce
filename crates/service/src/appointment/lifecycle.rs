use models::appointment::AppointmentStatus::{self, Cancelled, Completed, Confirmed, Pending};

use crate::errors::ServiceError;

fn invalid(msg: impl Into<String>) -> ServiceError { ServiceError::InvalidTransition(msg.into()) }

/// Field edits are allowed only before the appointment is finished.
pub fn ensure_mutable(from: AppointmentStatus) -> Result<(), ServiceError> {
    if from.is_terminal() {
        return Err(invalid("Cannot update completed or cancelled appointments"));
    }
    Ok(())
}

/// Assigning (or reassigning) a mechanic confirms the appointment.
pub fn assign_mechanic(from: AppointmentStatus) -> Result<AppointmentStatus, ServiceError> {
    match from {
        Pending | Confirmed => Ok(Confirmed),
        Completed | Cancelled => Err(invalid("Cannot assign a mechanic to completed or cancelled appointments")),
    }
}

pub fn cancel(from: AppointmentStatus) -> Result<AppointmentStatus, ServiceError> {
    match from {
        Pending | Confirmed => Ok(Cancelled),
        Completed => Err(invalid("Cannot cancel completed appointments")),
        Cancelled => Err(invalid("Appointment is already cancelled")),
    }
}

/// Status change requested directly by an admin user.
pub fn set_status(from: AppointmentStatus, to: AppointmentStatus) -> Result<AppointmentStatus, ServiceError> {
    ensure_mutable(from)?;
    match (from, to) {
        (f, t) if f == t => Ok(t),
        (_, Confirmed) => Err(invalid("Appointments are confirmed by assigning a mechanic")),
        (Pending, Cancelled) | (Confirmed, Completed) | (Confirmed, Cancelled) => Ok(to),
        (f, t) => Err(invalid(format!("Cannot change status from {f} to {t}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states_reject_everything() {
        for s in [Completed, Cancelled] {
            assert!(ensure_mutable(s).is_err());
            assert!(assign_mechanic(s).is_err());
            assert!(cancel(s).is_err());
            assert!(set_status(s, Pending).is_err());
            assert!(set_status(s, s).is_err());
        }
    }

    #[test]
    fn assignment_confirms() {
        assert_eq!(assign_mechanic(Pending).unwrap(), Confirmed);
        assert_eq!(assign_mechanic(Confirmed).unwrap(), Confirmed);
    }

    #[test]
    fn cancel_messages() {
        assert_eq!(cancel(Pending).unwrap(), Cancelled);
        assert_eq!(cancel(Confirmed).unwrap(), Cancelled);
        assert_eq!(cancel(Completed).unwrap_err().to_string(), "Cannot cancel completed appointments");
        assert_eq!(cancel(Cancelled).unwrap_err().to_string(), "Appointment is already cancelled");
    }

    #[test]
    fn admin_status_graph() {
        assert_eq!(set_status(Pending, Pending).unwrap(), Pending);
        assert_eq!(set_status(Pending, Cancelled).unwrap(), Cancelled);
        assert_eq!(set_status(Confirmed, Completed).unwrap(), Completed);
        assert_eq!(set_status(Confirmed, Cancelled).unwrap(), Cancelled);
        assert!(matches!(set_status(Pending, Confirmed), Err(ServiceError::InvalidTransition(_))));
        assert_eq!(
            set_status(Pending, Completed).unwrap_err().to_string(),
            "Cannot change status from pending to completed"
        );
        assert!(set_status(Confirmed, Pending).is_err());
    }
}
