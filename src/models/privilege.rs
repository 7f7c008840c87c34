use serde::Serialize;

use super::role;

// Привилегии закреплены в коде, в базе хранятся только роли.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Privilege {
    ApproveRegistrationRequest,
    RejectRegistrationRequest,
    ModifyProfileData,
    ViewOtherUsersProfile,
    ViewAllEvents,
    SearchEventsAndActivities,
    CreateEvent,
    ViewEventPlace,
    ViewRouteBetweenRooms,
    AssignOrganizerRole,
    RevokeOrganizerRole,
    CreateEventVenue,
    DeleteEventVenue,
    EditEventVenue,
    CreateRole,
    DeleteRole,
    EditRole,
    AssignSystemRole,
    RevokeSystemRole,
    EditEventInfo,
    AssignAssistantRole,
    RevokeAssistantRole,
    ViewOrganizerUsers,
    ViewAssistantUsers,
    CreateEventActivities,
    DeleteEventActivities,
    EditEventActivities,
    ViewEventActivities,
    CreateTask,
    DeleteTask,
    EditTask,
    ChangeTaskStatus,
    AssignTaskExecutor,
    ReplaceTaskExecutor,
    DeleteTaskExecutor,
    AssignOrganizationalRole,
    RevokeOrganizationalRole,
    ViewAllEventTasks,
    ChangeAssignedTaskStatus,
    DeclineTaskExecution,
    ImportParticipantListXlsx,
}

use Privilege::*;

pub const ADMIN_PRIVILEGES: &[Privilege] = &[
    ApproveRegistrationRequest,
    RejectRegistrationRequest,
    ModifyProfileData,
    ViewOtherUsersProfile,
    ViewAllEvents,
    SearchEventsAndActivities,
    CreateEvent,
    ViewEventPlace,
    ViewRouteBetweenRooms,
    AssignOrganizerRole,
    RevokeOrganizerRole,
    CreateEventVenue,
    DeleteEventVenue,
    EditEventVenue,
    CreateRole,
    DeleteRole,
    EditRole,
    AssignSystemRole,
    RevokeSystemRole,
];

pub const READER_PRIVILEGES: &[Privilege] = &[
    ModifyProfileData,
    ViewOtherUsersProfile,
    ViewAllEvents,
    SearchEventsAndActivities,
    CreateEvent,
    ViewEventPlace,
    ViewRouteBetweenRooms,
];

pub const ORGANIZER_PRIVILEGES: &[Privilege] = &[
    ViewAllEvents,
    SearchEventsAndActivities,
    ViewEventPlace,
    EditEventInfo,
    AssignAssistantRole,
    RevokeAssistantRole,
    ViewOrganizerUsers,
    ViewAssistantUsers,
    CreateEventActivities,
    DeleteEventActivities,
    EditEventActivities,
    ViewEventActivities,
    CreateTask,
    DeleteTask,
    EditTask,
    ChangeTaskStatus,
    AssignTaskExecutor,
    ReplaceTaskExecutor,
    DeleteTaskExecutor,
    AssignOrganizationalRole,
    RevokeOrganizationalRole,
    ViewAllEventTasks,
    ChangeAssignedTaskStatus,
    DeclineTaskExecution,
    ImportParticipantListXlsx,
];

pub const ASSISTANT_PRIVILEGES: &[Privilege] = &[
    ViewAllEvents,
    SearchEventsAndActivities,
    ViewEventPlace,
    ViewOrganizerUsers,
    ViewAssistantUsers,
    ViewEventActivities,
    ViewAllEventTasks,
    ChangeAssignedTaskStatus,
    DeclineTaskExecution,
];

// Набор привилегий базовой роли, для пользовательских ролей None
pub fn for_role(role_name: &str) -> Option<&'static [Privilege]> {
    match role_name {
        role::ADMIN_ROLE => Some(ADMIN_PRIVILEGES),
        role::READER_ROLE => Some(READER_PRIVILEGES),
        role::ORGANIZER_ROLE => Some(ORGANIZER_PRIVILEGES),
        role::ASSISTANT_ROLE => Some(ASSISTANT_PRIVILEGES),
        _ => None,
    }
}

pub fn role_has(role_name: &str, privilege: Privilege) -> bool {
    for_role(role_name)
        .map(|set| set.contains(&privilege))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn organizer_has_twenty_five_privileges() {
        assert_eq!(ORGANIZER_PRIVILEGES.len(), 25);
    }

    #[test]
    fn assistant_privileges_are_subset_of_organizer() {
        for privilege in ASSISTANT_PRIVILEGES {
            assert!(
                ORGANIZER_PRIVILEGES.contains(privilege),
                "{privilege:?} отсутствует у организатора"
            );
        }
    }

    #[test]
    fn only_admin_manages_registration_requests() {
        assert!(role_has(role::ADMIN_ROLE, ApproveRegistrationRequest));
        assert!(!role_has(role::READER_ROLE, ApproveRegistrationRequest));
        assert!(!role_has(role::ORGANIZER_ROLE, RejectRegistrationRequest));
    }

    #[test]
    fn organizer_manages_tasks_assistant_does_not() {
        assert!(role_has(role::ORGANIZER_ROLE, CreateTask));
        assert!(role_has(role::ORGANIZER_ROLE, DeleteTask));
        assert!(!role_has(role::ASSISTANT_ROLE, CreateTask));
        assert!(role_has(role::ASSISTANT_ROLE, ChangeAssignedTaskStatus));
    }

    #[test]
    fn unknown_role_has_no_privileges() {
        assert!(for_role("Смотритель").is_none());
        assert!(!role_has("Смотритель", ViewAllEvents));
    }

    #[test]
    fn privilege_serializes_as_screaming_snake_case() {
        let json = serde_json::to_string(&ChangeAssignedTaskStatus).unwrap();
        assert_eq!(json, "\"CHANGE_ASSIGNED_TASK_STATUS\"");
    }
}
