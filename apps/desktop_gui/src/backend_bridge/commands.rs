//! Backend commands queued from UI to backend worker.

use shared::{
    domain::ContactId,
    protocol::{CreateContactRequest, UpdateContactRequest},
};

#[derive(Debug)]
pub enum BackendCommand {
    FetchContacts,
    CreateContact {
        req: CreateContactRequest,
    },
    UpdateContact {
        contact_id: ContactId,
        req: UpdateContactRequest,
    },
    DeleteContact {
        contact_id: ContactId,
    },
}
