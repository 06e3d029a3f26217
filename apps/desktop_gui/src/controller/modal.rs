//! Modal state machine for the create/edit form.

use shared::protocol::ContactRecord;

/// One modal at a time: open requests made while a modal is already showing
/// are dropped, as a guard on the transition itself. Closing always discards
/// the selection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ModalState {
    #[default]
    Closed,
    OpenForCreate,
    OpenForEdit(ContactRecord),
}

impl ModalState {
    pub fn is_open(&self) -> bool {
        !matches!(self, ModalState::Closed)
    }

    /// Returns true when the transition happened.
    pub fn open_for_create(&mut self) -> bool {
        if self.is_open() {
            return false;
        }
        *self = ModalState::OpenForCreate;
        true
    }

    /// Returns true when the transition happened.
    pub fn open_for_edit(&mut self, contact: ContactRecord) -> bool {
        if self.is_open() {
            return false;
        }
        *self = ModalState::OpenForEdit(contact);
        true
    }

    pub fn close(&mut self) {
        *self = ModalState::Closed;
    }

    pub fn editing(&self) -> Option<&ContactRecord> {
        match self {
            ModalState::OpenForEdit(contact) => Some(contact),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::ContactId;

    fn contact(id: i64, first: &str) -> ContactRecord {
        ContactRecord {
            id: ContactId(id),
            first_name: first.to_string(),
            last_name: "Example".to_string(),
            email: format!("{}@example.com", first.to_ascii_lowercase()),
        }
    }

    #[test]
    fn opens_for_create_from_closed() {
        let mut modal = ModalState::default();
        assert!(modal.open_for_create());
        assert_eq!(modal, ModalState::OpenForCreate);
    }

    #[test]
    fn repeated_create_request_is_a_no_op() {
        let mut modal = ModalState::OpenForCreate;
        assert!(!modal.open_for_create());
        assert_eq!(modal, ModalState::OpenForCreate);
    }

    #[test]
    fn opens_for_edit_with_the_selected_contact() {
        let mut modal = ModalState::default();
        assert!(modal.open_for_edit(contact(2, "B")));
        assert_eq!(modal.editing(), Some(&contact(2, "B")));
    }

    #[test]
    fn edit_request_while_create_modal_open_is_dropped() {
        let mut modal = ModalState::OpenForCreate;
        assert!(!modal.open_for_edit(contact(3, "C")));
        assert_eq!(modal, ModalState::OpenForCreate);
    }

    #[test]
    fn edit_request_while_editing_keeps_current_selection() {
        let mut modal = ModalState::OpenForEdit(contact(1, "A"));
        assert!(!modal.open_for_edit(contact(2, "B")));
        assert_eq!(modal.editing(), Some(&contact(1, "A")));
    }

    #[test]
    fn close_discards_the_selection_from_any_open_state() {
        let mut modal = ModalState::OpenForEdit(contact(1, "A"));
        modal.close();
        assert_eq!(modal, ModalState::Closed);
        assert_eq!(modal.editing(), None);

        let mut modal = ModalState::OpenForCreate;
        modal.close();
        assert_eq!(modal, ModalState::Closed);
    }
}
