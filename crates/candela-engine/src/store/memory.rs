//! # In-Memory Store
//!
//! A complete, HashMap-backed implementation of every store trait.
//!
//! This is what the test suite runs against, and it is good enough for a
//! small host that loads state at startup and serializes it back out on
//! its own schedule. Anything needing durability or concurrency implements
//! the traits over a real database instead.

use std::collections::HashMap;

use candela_core::installment::InstallmentPlan;
use candela_core::types::{Customer, PriceChange, Product, Sale, Settings};

use crate::error::{EngineError, EngineResult};
use crate::store::{CustomerStore, InstallmentStore, ProductStore, SaleStore, SettingsStore};

/// In-memory store over HashMaps.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    products: HashMap<String, Product>,
    customers: HashMap<String, Customer>,
    sales: HashMap<String, Sale>,
    plans: HashMap<String, InstallmentPlan>,
    settings: Settings,
}

impl MemoryStore {
    /// Creates an empty store with the given settings.
    pub fn new(settings: Settings) -> Self {
        MemoryStore {
            products: HashMap::new(),
            customers: HashMap::new(),
            sales: HashMap::new(),
            plans: HashMap::new(),
            settings,
        }
    }

    /// Adds or replaces a product.
    pub fn add_product(&mut self, product: Product) {
        self.products.insert(product.id.clone(), product);
    }

    /// Adds or replaces a customer.
    pub fn add_customer(&mut self, customer: Customer) {
        self.customers.insert(customer.id.clone(), customer);
    }

    /// Adds or replaces an installment plan.
    pub fn add_plan(&mut self, plan: InstallmentPlan) {
        self.plans.insert(plan.id.clone(), plan);
    }

    /// Replaces the settings snapshot.
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }
}

impl ProductStore for MemoryStore {
    fn product(&self, id: &str) -> EngineResult<Product> {
        self.products
            .get(id)
            .cloned()
            .ok_or_else(|| EngineError::ProductNotFound(id.to_string()))
    }

    fn products(&self) -> EngineResult<Vec<Product>> {
        Ok(self.products.values().cloned().collect())
    }

    fn apply_quantity_delta(&mut self, id: &str, delta: i64) -> EngineResult<i64> {
        let product = self
            .products
            .get_mut(id)
            .ok_or_else(|| EngineError::ProductNotFound(id.to_string()))?;
        product.quantity += delta;
        Ok(product.quantity)
    }

    fn append_price_history(&mut self, id: &str, entry: PriceChange) -> EngineResult<()> {
        let product = self
            .products
            .get_mut(id)
            .ok_or_else(|| EngineError::ProductNotFound(id.to_string()))?;
        product.record_price_change(entry)?;
        Ok(())
    }
}

impl CustomerStore for MemoryStore {
    fn customer(&self, id: &str) -> EngineResult<Customer> {
        self.customers
            .get(id)
            .cloned()
            .ok_or_else(|| EngineError::CustomerNotFound(id.to_string()))
    }

    fn update_jar_credits(&mut self, id: &str, new_balance: i64) -> EngineResult<()> {
        let customer = self
            .customers
            .get_mut(id)
            .ok_or_else(|| EngineError::CustomerNotFound(id.to_string()))?;
        customer.jar_credits = new_balance;
        Ok(())
    }
}

impl SaleStore for MemoryStore {
    fn insert_sale(&mut self, sale: Sale) -> EngineResult<()> {
        self.sales.insert(sale.id.clone(), sale);
        Ok(())
    }

    fn sale(&self, id: &str) -> EngineResult<Sale> {
        self.sales
            .get(id)
            .cloned()
            .ok_or_else(|| EngineError::SaleNotFound(id.to_string()))
    }

    fn update_sale(&mut self, sale: Sale) -> EngineResult<()> {
        if !self.sales.contains_key(&sale.id) {
            return Err(EngineError::SaleNotFound(sale.id));
        }
        self.sales.insert(sale.id.clone(), sale);
        Ok(())
    }

    fn remove_sale(&mut self, id: &str) -> EngineResult<()> {
        self.sales
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| EngineError::SaleNotFound(id.to_string()))
    }

    fn sales(&self) -> EngineResult<Vec<Sale>> {
        Ok(self.sales.values().cloned().collect())
    }
}

impl InstallmentStore for MemoryStore {
    fn plan(&self, id: &str) -> EngineResult<InstallmentPlan> {
        self.plans
            .get(id)
            .cloned()
            .ok_or_else(|| EngineError::PlanNotFound(id.to_string()))
    }

    fn upsert_plan(&mut self, plan: InstallmentPlan) -> EngineResult<()> {
        self.plans.insert(plan.id.clone(), plan);
        Ok(())
    }
}

impl SettingsStore for MemoryStore {
    fn settings(&self) -> EngineResult<Settings> {
        Ok(self.settings.clone())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
