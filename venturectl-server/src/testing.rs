//! In-memory repositories for router tests

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::Utc;
use tower::ServiceExt;

use venturectl_core::{
    Amount, Category, Deadline, DeleteOutcome, Investment, InvestmentPatch, InvestmentRepository,
    NewInvestment, OrderRule, RankPosition, RepositoryError, Startup, StartupQuery,
    StartupRepository, UpdateOutcome,
};

use crate::http::{router, AppState};

#[derive(Default)]
pub struct Calls {
    pub fetch: AtomicUsize,
    pub count: AtomicUsize,
    pub find_many: AtomicUsize,
    pub writes: AtomicUsize,
}

pub fn hits(counter: &AtomicUsize) -> usize {
    counter.load(Ordering::SeqCst)
}

/// Startups and investments held in memory, with call counters
#[derive(Default)]
pub struct MemoryStore {
    startups: Mutex<Vec<Startup>>,
    investments: Mutex<BTreeMap<i64, (Investment, String)>>,
    next_investment_id: AtomicUsize,
    pub calls: Calls,
}

impl MemoryStore {
    /// `n` startups with ids 1..=n; sim_invest grows with id.
    pub fn with_startups(n: i64) -> Arc<Self> {
        let store = Self::default();
        {
            let mut startups = store.startups.lock().unwrap();
            *startups = (1..=n).map(sample_startup).collect();
        }
        Arc::new(store)
    }

    /// Store an investment directly, bypassing the write counter. The
    /// startup's `sim_invest` still grows by the seeded amount.
    pub fn seed_investment(&self, startup_id: i64, password: &str) -> Investment {
        let now = Utc::now();
        let id = self.next_investment_id.fetch_add(1, Ordering::SeqCst) as i64 + 1;
        let investment = Investment {
            id,
            startup_id,
            name: "seeded".into(),
            invest_amount: Amount::from(1_000),
            comment: String::new(),
            created_at: now,
            updated_at: now,
        };
        self.add_sim_invest(startup_id, &investment.invest_amount);
        self.investments
            .lock()
            .unwrap()
            .insert(id, (investment.clone(), password.to_string()));
        investment
    }

    pub fn investment_count(&self) -> usize {
        self.investments.lock().unwrap().len()
    }

    pub fn startup(&self, id: i64) -> Option<Startup> {
        self.startups.lock().unwrap().iter().find(|s| s.id == id).cloned()
    }

    fn add_sim_invest(&self, startup_id: i64, amount: &Amount) {
        let mut startups = self.startups.lock().unwrap();
        if let Some(startup) = startups.iter_mut().find(|s| s.id == startup_id) {
            startup.sim_invest = &startup.sim_invest + amount;
        }
    }

    fn remove_sim_invest(&self, startup_id: i64, amount: &Amount) {
        let mut startups = self.startups.lock().unwrap();
        if let Some(startup) = startups.iter_mut().find(|s| s.id == startup_id) {
            startup.sim_invest = startup.sim_invest.saturating_sub(amount);
        }
    }

    fn matching(&self, query: &StartupQuery) -> Vec<Startup> {
        let mut items: Vec<Startup> = self
            .startups
            .lock()
            .unwrap()
            .iter()
            .filter(|s| query.filter.matches(s))
            .cloned()
            .collect();
        query.order.sort(&mut items);
        items
    }
}

pub fn sample_startup(id: i64) -> Startup {
    Startup {
        id,
        name: format!("Startup {}", id),
        description: format!("description {}", id),
        image: None,
        category: Some(Category {
            id: 1,
            name: "fintech".into(),
        }),
        actual_invest: Amount::from(id as u64 * 10),
        sim_invest: Amount::from(id as u64 * 100),
        revenue: Amount::zero(),
        employees: id as i32,
        count: 0,
    }
}

#[async_trait]
impl StartupRepository for MemoryStore {
    async fn fetch(
        &self,
        query: &StartupQuery,
        skip: i64,
        take: i64,
    ) -> Result<Vec<Startup>, RepositoryError> {
        self.calls.fetch.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .matching(query)
            .into_iter()
            .skip(skip as usize)
            .take(take as usize)
            .collect())
    }

    async fn count(&self, query: &StartupQuery) -> Result<i64, RepositoryError> {
        self.calls.count.fetch_add(1, Ordering::SeqCst);
        Ok(self.matching(query).len() as i64)
    }

    async fn get(&self, id: i64, _: Deadline) -> Result<Option<Startup>, RepositoryError> {
        Ok(self.startup(id))
    }

    async fn find_many(
        &self,
        ids: &[i64],
        order: OrderRule,
        _: Deadline,
    ) -> Result<Vec<Startup>, RepositoryError> {
        self.calls.find_many.fetch_add(1, Ordering::SeqCst);
        let mut items: Vec<Startup> = self
            .startups
            .lock()
            .unwrap()
            .iter()
            .filter(|s| ids.contains(&s.id))
            .cloned()
            .collect();
        order.sort(&mut items);
        Ok(items)
    }

    async fn rank_of(
        &self,
        id: i64,
        order: OrderRule,
        _: Deadline,
    ) -> Result<Option<RankPosition>, RepositoryError> {
        let mut items = self.startups.lock().unwrap().clone();
        order.sort(&mut items);
        Ok(items.iter().position(|s| s.id == id).map(|index| RankPosition {
            index,
            total: items.len(),
        }))
    }

    async fn record_selection(
        &self,
        id: i64,
        _: Deadline,
    ) -> Result<Option<Startup>, RepositoryError> {
        let mut startups = self.startups.lock().unwrap();
        Ok(startups.iter_mut().find(|s| s.id == id).map(|s| {
            s.count += 1;
            s.clone()
        }))
    }
}

#[async_trait]
impl InvestmentRepository for MemoryStore {
    async fn get(&self, id: i64, _: Deadline) -> Result<Option<Investment>, RepositoryError> {
        Ok(self
            .investments
            .lock()
            .unwrap()
            .get(&id)
            .map(|(inv, _)| inv.clone()))
    }

    async fn create(
        &self,
        new: &NewInvestment,
        _: Deadline,
    ) -> Result<Investment, RepositoryError> {
        if self.startup(new.startup_id).is_none() {
            return Err(RepositoryError::not_found("startup", new.startup_id));
        }
        self.calls.writes.fetch_add(1, Ordering::SeqCst);

        let now = Utc::now();
        let id = self.next_investment_id.fetch_add(1, Ordering::SeqCst) as i64 + 1;
        let investment = Investment {
            id,
            startup_id: new.startup_id,
            name: new.name.clone(),
            invest_amount: new.invest_amount.clone(),
            comment: new.comment.clone(),
            created_at: now,
            updated_at: now,
        };
        self.add_sim_invest(new.startup_id, &new.invest_amount);
        self.investments
            .lock()
            .unwrap()
            .insert(id, (investment.clone(), new.password.clone()));
        Ok(investment)
    }

    async fn update(
        &self,
        id: i64,
        patch: &InvestmentPatch,
        _: Deadline,
    ) -> Result<UpdateOutcome, RepositoryError> {
        if let Some(startup_id) = patch.startup_id {
            if self.startup(startup_id).is_none() {
                return Err(RepositoryError::not_found("startup", startup_id));
            }
        }

        let (before, after) = {
            let mut investments = self.investments.lock().unwrap();
            let Some((investment, password)) = investments.get_mut(&id) else {
                return Ok(UpdateOutcome::NotFound);
            };
            if patch.password.is_some()
                && patch.current_password.as_deref() != Some(password.as_str())
            {
                return Ok(UpdateOutcome::PasswordMismatch);
            }

            self.calls.writes.fetch_add(1, Ordering::SeqCst);
            let before = investment.clone();
            patch.apply_to(investment);
            if let Some(new_password) = &patch.password {
                *password = new_password.clone();
            }
            investment.updated_at = Utc::now();
            (before, investment.clone())
        };

        self.remove_sim_invest(before.startup_id, &before.invest_amount);
        self.add_sim_invest(after.startup_id, &after.invest_amount);
        Ok(UpdateOutcome::Updated(after))
    }

    async fn delete(
        &self,
        id: i64,
        password: &str,
        _: Deadline,
    ) -> Result<DeleteOutcome, RepositoryError> {
        let removed = {
            let mut investments = self.investments.lock().unwrap();
            let outcome = match investments.get(&id) {
                None => DeleteOutcome::NotFound,
                Some((_, stored)) if stored != password => DeleteOutcome::PasswordMismatch,
                Some(_) => DeleteOutcome::Deleted,
            };
            if outcome != DeleteOutcome::Deleted {
                return Ok(outcome);
            }
            investments.remove(&id)
        };

        if let Some((investment, _)) = removed {
            self.calls.writes.fetch_add(1, Ordering::SeqCst);
            self.remove_sim_invest(investment.startup_id, &investment.invest_amount);
        }
        Ok(DeleteOutcome::Deleted)
    }
}

/// Router over a memory store, without CORS or tracing layers.
pub fn test_router(store: &Arc<MemoryStore>) -> Router {
    router(AppState {
        startups: store.clone(),
        investments: store.clone(),
        query_timeout: None,
    })
}

/// Send one request and decode the JSON body (Null when empty).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, axum::http::HeaderMap, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, headers, json)
}
