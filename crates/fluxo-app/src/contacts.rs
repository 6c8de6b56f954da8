//! # Contact Service
//!
//! Cadastros of clients, suppliers and employees.
//!
//! Documents and phones are stored masked, so whatever the user typed
//! ("12345678909", "123.456.789-09") ends up in one canonical form.

use tracing::{info, instrument, warn};

use fluxo_core::document::{format_cpf_or_cnpj, format_phone, Document};
use fluxo_core::validation::validate_contact;
use fluxo_core::{ContactRecord, ContactStatus};

use crate::error::{AppError, AppResult};
use crate::session::Session;
use crate::store::{RecordStore, StoredRecord};
use crate::view::{RecordView, ViewPage};

pub struct ContactService<S> {
    store: S,
    session: Session,
}

impl<S: RecordStore<ContactRecord>> ContactService<S> {
    pub fn new(store: S, session: Session) -> Self {
        ContactService { store, session }
    }

    pub async fn load(&self) -> AppResult<Vec<ContactRecord>> {
        self.store.fetch_records().await
    }

    /// Validates, normalises and persists `contact`.
    #[instrument(skip(self, contact), fields(kind = %contact.kind))]
    pub async fn submit(&self, mut contact: ContactRecord) -> AppResult<ContactRecord> {
        validate_contact(&contact)?;

        contact.name = contact.name.trim().to_string();
        if !contact.document.trim().is_empty() {
            let document = Document::parse(&contact.document)?;
            if !document.has_valid_check_digits() {
                // Accepted as typed: older registrations carry unverified numbers
                warn!(document = %document, "Document check digits do not match");
            }
            contact.document = format_cpf_or_cnpj(document.digits());
        }
        contact.phone = contact
            .phone
            .as_deref()
            .map(format_phone)
            .filter(|p| !p.is_empty());
        contact.owner_id = Some(self.session.require_user()?);

        let stored = self.store.submit(contact).await?;
        info!(id = %stored.id, "Contact saved");
        Ok(stored)
    }

    /// Activates or deactivates the contact with `id`.
    pub async fn set_status(&self, id: &str, status: ContactStatus) -> AppResult<ContactRecord> {
        let mut contact = self
            .load()
            .await?
            .into_iter()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::NotFound {
                entity: ContactRecord::ENTITY.to_string(),
                id: id.to_string(),
            })?;

        contact.status = status;
        let stored = self.store.submit(contact).await?;
        info!(id = %id, ?status, "Contact status changed");
        Ok(stored)
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.store.delete(id).await?;
        info!(id = %id, "Contact deleted");
        Ok(())
    }

    /// Renders the current page of the cadastros screen.
    pub async fn page(&self, view: &mut RecordView) -> AppResult<ViewPage<ContactRecord>> {
        let contacts = self.load().await?;
        Ok(view.render(&contacts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use fluxo_core::{ContactKind, CoreError, ValidationError};

    fn service() -> ContactService<MemoryStore<ContactRecord>> {
        ContactService::new(MemoryStore::new(), Session::for_user("user-1"))
    }

    #[tokio::test]
    async fn test_submit_normalises() {
        let contacts = service();
        let mut ana = ContactRecord::new(" Ana Souza ", "52998224725", ContactKind::Cliente);
        ana.phone = Some("1134567890".to_string());

        let stored = contacts.submit(ana).await.unwrap();
        assert_eq!(stored.name, "Ana Souza");
        assert_eq!(stored.document, "529.982.247-25");
        assert_eq!(stored.phone.as_deref(), Some("(11) 3456-7890"));
        assert_eq!(stored.owner_id.as_deref(), Some("user-1"));
    }

    #[tokio::test]
    async fn test_submit_rejects_incomplete_document() {
        let contacts = service();
        let partial = ContactRecord::new("Bruno", "123.456", ContactKind::Fornecedor);

        let err = contacts.submit(partial).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Core(CoreError::Validation(ValidationError::InvalidFormat { .. }))
        ));
        assert!(contacts.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_set_status() {
        let contacts = service();
        let stored = contacts
            .submit(ContactRecord::new("Carla", "", ContactKind::Funcionario))
            .await
            .unwrap();

        let updated = contacts.set_status(&stored.id, ContactStatus::Inativo).await.unwrap();
        assert!(!updated.is_active());
        assert_eq!(contacts.load().await.unwrap().len(), 1);

        let err = contacts.set_status("missing", ContactStatus::Ativo).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_page_filters_by_document_digits() {
        let contacts = service();
        contacts
            .submit(ContactRecord::new("Ana Souza", "52998224725", ContactKind::Cliente))
            .await
            .unwrap();
        contacts
            .submit(ContactRecord::new("Padaria Central", "11222333000181", ContactKind::Fornecedor))
            .await
            .unwrap();

        let mut view = RecordView::default();
        view.set_search_term("0001-81");
        let page = contacts.page(&mut view).await.unwrap();
        assert_eq!(page.total_filtered, 1);
        assert_eq!(page.items[0].name, "Padaria Central");
    }
}
