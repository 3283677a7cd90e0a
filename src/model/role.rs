#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Role {
    Admin = 1,
    Employee = 2,
}

/// Everything a session can ask the portal to do. Handlers authorize against
/// these instead of comparing roles inline, so the role -> action table lives
/// in exactly one place.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Action {
    MarkAttendance,
    RequestLeave,
    ReadAnnouncements,
    ViewDirectory,
    ManageUsers,
    ViewOthersAttendance,
    ReviewLeave,
    PublishAnnouncements,
}

impl Role {
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Role::Admin),
            2 => Some(Role::Employee),
            _ => None,
        }
    }

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Employee => "employee",
        }
    }

    pub fn allows(self, action: Action) -> bool {
        use Action::*;
        match action {
            MarkAttendance | RequestLeave | ReadAnnouncements => true,
            ViewDirectory | ManageUsers | ViewOthersAttendance | ReviewLeave
            | PublishAnnouncements => self == Role::Admin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_role_id_rejected() {
        assert_eq!(Role::from_id(1), Some(Role::Admin));
        assert_eq!(Role::from_id(2), Some(Role::Employee));
        assert_eq!(Role::from_id(0), None);
        assert_eq!(Role::from_id(7), None);
    }

    #[test]
    fn test_employee_capabilities() {
        let role = Role::Employee;
        assert!(role.allows(Action::MarkAttendance));
        assert!(role.allows(Action::RequestLeave));
        assert!(role.allows(Action::ReadAnnouncements));
        assert!(!role.allows(Action::ViewDirectory));
        assert!(!role.allows(Action::ManageUsers));
        assert!(!role.allows(Action::ViewOthersAttendance));
        assert!(!role.allows(Action::ReviewLeave));
        assert!(!role.allows(Action::PublishAnnouncements));
    }

    #[test]
    fn test_admin_allowed_everything() {
        let all = [
            Action::MarkAttendance,
            Action::RequestLeave,
            Action::ReadAnnouncements,
            Action::ViewDirectory,
            Action::ManageUsers,
            Action::ViewOthersAttendance,
            Action::ReviewLeave,
            Action::PublishAnnouncements,
        ];
        for action in all {
            assert!(Role::Admin.allows(action), "admin denied {:?}", action);
        }
    }
}
