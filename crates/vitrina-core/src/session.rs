//! Per-client storefront state: the shopping cart and the admin gate.
//!
//! One [`Session`] exists per connected client. It is created on first
//! interaction and dropped when the client goes away.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::error::SessionError;
use crate::products::ProductRecord;

/// Ordered multiset of products selected by the current client.
///
/// Items are clones, so edits to the catalog do not touch the cart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    items: Vec<ProductRecord>,
}

impl Cart {
    pub fn add(&mut self, product: &ProductRecord) {
        self.items.push(product.clone());
    }

    /// Removes the item at `index` and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::CartIndex`] if `index` is out of range.
    pub fn remove_at(&mut self, index: usize) -> Result<ProductRecord, SessionError> {
        if index >= self.items.len() {
            return Err(SessionError::CartIndex {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }

    #[must_use]
    pub fn items(&self) -> &[ProductRecord] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of item prices.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.items.iter().map(|p| p.price).sum()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// Admin password holder. Only the SHA-256 digest is kept.
#[derive(Clone)]
pub struct AdminCredentials {
    digest: Option<[u8; 32]>,
}

impl AdminCredentials {
    /// Credentials that never unlock. Used when no admin password is configured.
    #[must_use]
    pub fn disabled() -> Self {
        Self { digest: None }
    }

    #[must_use]
    pub fn from_password(password: &str) -> Self {
        Self {
            digest: Some(Sha256::digest(password.as_bytes()).into()),
        }
    }

    #[must_use]
    pub fn from_config(password: Option<&str>) -> Self {
        password.map_or_else(Self::disabled, Self::from_password)
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.digest.is_some()
    }

    fn verify(&self, candidate: &str) -> bool {
        let Some(expected) = self.digest else {
            return false;
        };
        let actual: [u8; 32] = Sha256::digest(candidate.as_bytes()).into();
        expected.as_slice().ct_eq(actual.as_slice()).into()
    }
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdminState {
    /// Panel hidden.
    #[default]
    Closed,
    /// Panel shown, waiting for the password.
    PanelOpen,
    /// Password accepted; catalog edits allowed.
    Unlocked,
}

/// Partial update applied to one catalog product by an admin.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductEdit {
    pub id: Option<String>,
    pub name: Option<String>,
    pub price: Option<f64>,
    pub img: Option<String>,
}

impl ProductEdit {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.name.is_none() && self.price.is_none() && self.img.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    pub cart: Cart,
    admin: AdminState,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            cart: Cart::default(),
            admin: AdminState::Closed,
        }
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn admin_state(&self) -> AdminState {
        self.admin
    }

    #[must_use]
    pub fn is_admin_unlocked(&self) -> bool {
        self.admin == AdminState::Unlocked
    }

    /// Opens the admin panel, or closes it (and relocks) if it is open.
    pub fn toggle_admin_panel(&mut self) {
        self.admin = match self.admin {
            AdminState::Closed => AdminState::PanelOpen,
            AdminState::PanelOpen | AdminState::Unlocked => AdminState::Closed,
        };
    }

    /// Tries to unlock catalog editing. Opens the panel if it was closed.
    ///
    /// Returns `true` when the password matches.
    pub fn unlock(&mut self, password: &str, credentials: &AdminCredentials) -> bool {
        if credentials.verify(password) {
            self.admin = AdminState::Unlocked;
            true
        } else {
            // A rejected password leaves the panel open but locked.
            self.admin = AdminState::PanelOpen;
            false
        }
    }

    /// Ends the admin session and hides the panel.
    pub fn lock(&mut self) {
        self.admin = AdminState::Closed;
    }

    /// Applies `edit` to the catalog product identified by `id`.
    ///
    /// # Errors
    ///
    /// - [`SessionError::AdminLocked`] unless the session is unlocked.
    /// - [`SessionError::EmptyName`] if the edit would blank the name.
    /// - [`SessionError::NotFound`] if no product has that id.
    pub fn edit_product(
        &self,
        catalog: &mut [ProductRecord],
        id: &str,
        edit: ProductEdit,
    ) -> Result<(), SessionError> {
        if !self.is_admin_unlocked() {
            return Err(SessionError::AdminLocked);
        }
        if edit.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(SessionError::EmptyName);
        }

        let product = catalog
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| SessionError::NotFound(id.to_owned()))?;

        if let Some(new_id) = edit.id {
            product.id = new_id.trim().to_owned();
        }
        if let Some(name) = edit.name {
            product.name = name.trim().to_owned();
        }
        if let Some(price) = edit.price {
            product.price = if price.is_finite() { price } else { 0.0 };
        }
        if let Some(img) = edit.img {
            product.img = img.trim().to_owned();
        }
        Ok(())
    }
}
