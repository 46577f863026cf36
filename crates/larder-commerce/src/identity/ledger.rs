//! The active cart and the owner transitions that move it.

use crate::cart::CartStore;
use crate::catalog::Product;
use crate::checkout::{CheckoutAssembler, Fulfilment, OrderGateway, OrderPayload, OrderReceipt};
use crate::error::CommerceError;
use crate::identity::{CartRepository, OwnerKey};
use crate::ids::LineId;
use crate::pricing::PricingEngine;

/// Tracks the current owner and keeps their cart persisted.
///
/// Every successful mutation is saved before the call returns. Logging in
/// merges the guest cart into the user's cart once; logging out only
/// detaches.
#[derive(Debug)]
pub struct IdentityLedger<R> {
    repo: R,
    engine: PricingEngine,
    owner: OwnerKey,
    cart: CartStore,
}

impl<R: CartRepository> IdentityLedger<R> {
    /// Load the owner's cart, or start an empty one.
    pub fn open(repo: R, owner: OwnerKey, engine: PricingEngine) -> Result<Self, CommerceError> {
        let cart = repo
            .load(&owner)?
            .unwrap_or_else(|| CartStore::new(engine.currency()));
        tracing::debug!(%owner, lines = cart.unique_line_count(), "cart opened");
        Ok(Self {
            repo,
            engine,
            owner,
            cart,
        })
    }

    pub fn owner(&self) -> &OwnerKey {
        &self.owner
    }

    /// Read-only view of the active cart.
    pub fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub fn engine(&self) -> &PricingEngine {
        &self.engine
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn add_to_cart(
        &mut self,
        product: &Product,
        requested: Option<i64>,
    ) -> Result<LineId, CommerceError> {
        let id = self.cart.add_to_cart(&self.engine, product, requested)?;
        self.persist()?;
        Ok(id)
    }

    pub fn update_quantity(&mut self, line_id: &LineId, quantity: i64) -> Result<bool, CommerceError> {
        let changed = self.cart.update_quantity(line_id, quantity);
        self.persist_if(changed)
    }

    pub fn set_quantity_text(&mut self, line_id: &LineId, text: &str) -> Result<bool, CommerceError> {
        let changed = self.cart.set_quantity_text(line_id, text);
        self.persist_if(changed)
    }

    pub fn increment(&mut self, line_id: &LineId) -> Result<bool, CommerceError> {
        let changed = self.cart.increment(line_id);
        self.persist_if(changed)
    }

    pub fn decrement(&mut self, line_id: &LineId) -> Result<bool, CommerceError> {
        let changed = self.cart.decrement(line_id);
        self.persist_if(changed)
    }

    pub fn remove_line(&mut self, line_id: &LineId) -> Result<bool, CommerceError> {
        let changed = self.cart.remove_line(line_id);
        self.persist_if(changed)
    }

    /// Empty the active cart and drop its stored copy.
    pub fn clear(&mut self) -> Result<(), CommerceError> {
        self.repo.remove(&self.owner)?;
        self.cart.clear();
        tracing::info!(owner = %self.owner, "cart cleared");
        Ok(())
    }

    /// React to the identity collaborator reporting a new owner.
    ///
    /// Only a login (anonymous to authenticated) merges. Every other change
    /// activates the next owner's stored cart as it is.
    pub fn on_identity_change(
        &mut self,
        previous: &OwnerKey,
        next: OwnerKey,
    ) -> Result<(), CommerceError> {
        if previous != &self.owner {
            tracing::warn!(
                reported = %previous,
                active = %self.owner,
                "identity change reported from a stale owner"
            );
        }
        if next == self.owner {
            return Ok(());
        }

        match (self.owner.is_authenticated(), next.is_authenticated()) {
            (false, true) => self.login(next),
            (true, false) => self.logout(next),
            (true, true) => self.switch_owner(next),
            (false, false) => self.detach(next),
        }
    }

    /// Activate another owner's cart without merging.
    pub fn switch_owner(&mut self, next: OwnerKey) -> Result<(), CommerceError> {
        tracing::warn!(from = %self.owner, to = %next, "switching owner without merge");
        self.detach(next)
    }

    fn login(&mut self, user: OwnerKey) -> Result<(), CommerceError> {
        let mut target = self
            .repo
            .load(&user)?
            .unwrap_or_else(|| CartStore::new(self.engine.currency()));
        let pending_lines = self.cart.unique_line_count();
        target.merge_from(self.cart.clone())?;

        // The guest copy never outlives a stored merge.
        self.repo.remove(&self.owner)?;
        if let Err(err) = self.repo.save(&user, &target) {
            if let Err(restore) = self.repo.save(&self.owner, &self.cart) {
                tracing::warn!(owner = %self.owner, error = %restore, "guest cart could not be restored");
            }
            return Err(err);
        }
        tracing::info!(
            from = %self.owner,
            to = %user,
            pending_lines,
            lines = target.unique_line_count(),
            "guest cart merged"
        );
        self.owner = user;
        self.cart = target;
        Ok(())
    }

    fn logout(&mut self, guest: OwnerKey) -> Result<(), CommerceError> {
        tracing::info!(from = %self.owner, to = %guest, "logged out");
        self.detach(guest)
    }

    fn detach(&mut self, next: OwnerKey) -> Result<(), CommerceError> {
        self.cart = self
            .repo
            .load(&next)?
            .unwrap_or_else(|| CartStore::new(self.engine.currency()));
        self.owner = next;
        Ok(())
    }

    /// Submit the active cart as an order. The cart is cleared only after
    /// the gateway accepts it.
    pub fn complete_checkout<G: OrderGateway + ?Sized>(
        &mut self,
        assembler: &CheckoutAssembler,
        fulfilment: &Fulfilment,
        gateway: &G,
    ) -> Result<(OrderPayload, OrderReceipt), CommerceError> {
        let payload = assembler.assemble(&self.cart, fulfilment, self.owner.user_id())?;
        let receipt = gateway.submit(&payload)?;
        tracing::info!(order = %payload.id, reference = %receipt.reference, "order submitted");
        self.clear()?;
        Ok((payload, receipt))
    }

    fn persist(&self) -> Result<(), CommerceError> {
        self.repo.save(&self.owner, &self.cart)
    }

    fn persist_if(&self, changed: bool) -> Result<bool, CommerceError> {
        if changed {
            self.persist()?;
        }
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::MemoryRepository;
    use crate::ids::{GuestToken, UserId};
    use crate::money::{Currency, Money};
    use rust_decimal::Decimal;
    use std::cell::{Cell, RefCell};

    fn guest() -> OwnerKey {
        OwnerKey::Anonymous(GuestToken::new("sess_guest"))
    }

    fn user(id: &str) -> OwnerKey {
        OwnerKey::Authenticated(UserId::new(id))
    }

    fn eggs() -> Product {
        Product::unit_based(
            "eggs",
            "Huevos",
            Money::from_major(100, Currency::ARS),
            Decimal::new(20, 2),
            4,
        )
    }

    fn open(repo: &MemoryRepository, owner: OwnerKey) -> IdentityLedger<&MemoryRepository> {
        IdentityLedger::open(repo, owner, PricingEngine::new(Currency::ARS)).unwrap()
    }

    /// Memory repository whose writes can be switched to fail.
    #[derive(Default)]
    struct FlakyRepository {
        inner: MemoryRepository,
        fail_save_for: RefCell<Option<OwnerKey>>,
        fail_remove: Cell<bool>,
    }

    impl CartRepository for FlakyRepository {
        fn load(&self, owner: &OwnerKey) -> Result<Option<CartStore>, CommerceError> {
            self.inner.load(owner)
        }

        fn save(&self, owner: &OwnerKey, cart: &CartStore) -> Result<(), CommerceError> {
            if self.fail_save_for.borrow().as_ref() == Some(owner) {
                return Err(CommerceError::Storage("disk full".into()));
            }
            self.inner.save(owner, cart)
        }

        fn remove(&self, owner: &OwnerKey) -> Result<(), CommerceError> {
            if self.fail_remove.get() {
                return Err(CommerceError::Storage("read-only".into()));
            }
            self.inner.remove(owner)
        }
    }

    #[test]
    fn test_mutations_persist() {
        let repo = MemoryRepository::new();
        let mut ledger = open(&repo, guest());
        let id = ledger.add_to_cart(&eggs(), Some(2)).unwrap();
        ledger.increment(&id).unwrap();

        let reopened = open(&repo, guest());
        assert_eq!(reopened.cart().line(&id).unwrap().quantity_value(), 3);
    }

    #[test]
    fn test_unknown_line_does_not_write() {
        let repo = MemoryRepository::new();
        let mut ledger = open(&repo, guest());
        assert!(!ledger.remove_line(&LineId::new("ghost")).unwrap());
        assert!(repo.is_empty());
    }

    #[test]
    fn test_login_merges_and_discards_guest_cart() {
        let repo = MemoryRepository::new();
        let mut ledger = open(&repo, guest());
        ledger.add_to_cart(&eggs(), Some(2)).unwrap();

        ledger.on_identity_change(&guest(), user("7")).unwrap();

        assert_eq!(ledger.owner(), &user("7"));
        assert_eq!(ledger.cart().item_count(), 2);
        assert!(repo.load(&guest()).unwrap().is_none());
        assert_eq!(repo.load(&user("7")).unwrap().as_ref(), Some(ledger.cart()));
    }

    #[test]
    fn test_failed_login_save_keeps_guest_cart_once() {
        let repo = FlakyRepository::default();
        let mut ledger =
            IdentityLedger::open(&repo, guest(), PricingEngine::new(Currency::ARS)).unwrap();
        ledger.add_to_cart(&eggs(), Some(2)).unwrap();

        *repo.fail_save_for.borrow_mut() = Some(user("7"));
        assert!(ledger.on_identity_change(&guest(), user("7")).is_err());
        assert_eq!(ledger.owner(), &guest());
        assert_eq!(repo.load(&guest()).unwrap().unwrap().item_count(), 2);
        assert!(repo.load(&user("7")).unwrap().is_none());

        // Retrying merges the guest cart exactly once.
        *repo.fail_save_for.borrow_mut() = None;
        ledger.on_identity_change(&guest(), user("7")).unwrap();
        assert_eq!(ledger.cart().item_count(), 2);
        assert!(repo.load(&guest()).unwrap().is_none());
    }

    #[test]
    fn test_failed_guest_removal_aborts_login() {
        let repo = FlakyRepository::default();
        let mut ledger =
            IdentityLedger::open(&repo, guest(), PricingEngine::new(Currency::ARS)).unwrap();
        ledger.add_to_cart(&eggs(), Some(2)).unwrap();

        repo.fail_remove.set(true);
        assert!(ledger.on_identity_change(&guest(), user("7")).is_err());
        assert_eq!(ledger.owner(), &guest());
        assert!(repo.load(&user("7")).unwrap().is_none());
    }

    #[test]
    fn test_failed_clear_keeps_cart_in_memory() {
        let repo = FlakyRepository::default();
        let mut ledger =
            IdentityLedger::open(&repo, guest(), PricingEngine::new(Currency::ARS)).unwrap();
        ledger.add_to_cart(&eggs(), Some(2)).unwrap();

        repo.fail_remove.set(true);
        assert!(ledger.clear().is_err());
        assert_eq!(ledger.cart().item_count(), 2);
        assert_eq!(repo.load(&guest()).unwrap().as_ref(), Some(ledger.cart()));
    }

    #[test]
    fn test_logout_keeps_user_cart_and_detaches() {
        let repo = MemoryRepository::new();
        let mut ledger = open(&repo, user("7"));
        ledger.add_to_cart(&eggs(), Some(4)).unwrap();

        ledger.on_identity_change(&user("7"), guest()).unwrap();
        assert!(ledger.cart().is_empty());
        assert_eq!(repo.load(&user("7")).unwrap().unwrap().item_count(), 4);

        // Logging back in with an empty guest cart leaves the user cart as is.
        ledger.on_identity_change(&guest(), user("7")).unwrap();
        assert_eq!(ledger.cart().item_count(), 4);
    }

    #[test]
    fn test_user_to_user_switches_without_merge() {
        let repo = MemoryRepository::new();
        let mut ledger = open(&repo, user("7"));
        ledger.add_to_cart(&eggs(), Some(1)).unwrap();

        ledger.on_identity_change(&user("7"), user("8")).unwrap();
        assert_eq!(ledger.owner(), &user("8"));
        assert!(ledger.cart().is_empty());
        assert_eq!(repo.load(&user("7")).unwrap().unwrap().item_count(), 1);
    }

    #[test]
    fn test_same_owner_is_noop() {
        let repo = MemoryRepository::new();
        let mut ledger = open(&repo, guest());
        ledger.add_to_cart(&eggs(), None).unwrap();
        ledger.on_identity_change(&guest(), guest()).unwrap();
        assert_eq!(ledger.cart().item_count(), 1);
    }

    #[test]
    fn test_clear_removes_stored_cart() {
        let repo = MemoryRepository::new();
        let mut ledger = open(&repo, guest());
        ledger.add_to_cart(&eggs(), None).unwrap();
        ledger.clear().unwrap();
        assert!(ledger.cart().is_empty());
        assert!(repo.is_empty());
    }
}
