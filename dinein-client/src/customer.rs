//! 顾客端 - 扫码后的点餐会话
//!
//! Once the server reports the session invalid (checked out, closed by
//! staff, superseded, unknown) the session enters a terminal state and
//! refuses every further call without contacting the server.

use parking_lot::RwLock;
use shared::models::{Catalog, DiningTable, SessionInvalidReason, SessionValidation};
use shared::order::{CheckoutSnapshot, OrderSelection, SessionOrders};
use shared::response::SubmitOrderResponse;
use shared::table::CallKind;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::{ClientConfig, ClientError, ClientResult, PosBackend};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Active,
    /// 终态
    Invalid(SessionInvalidReason),
}

pub struct CustomerSession {
    backend: Arc<dyn PosBackend>,
    table_id: i64,
    session_id: String,
    state: RwLock<SessionState>,
    orders: RwLock<Option<SessionOrders>>,
    /// One submission at a time
    submit_lock: Mutex<()>,
    mutation_timeout: Duration,
}

impl std::fmt::Debug for CustomerSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomerSession")
            .field("table_id", &self.table_id)
            .field("session_id", &self.session_id)
            .field("state", &*self.state.read())
            .finish_non_exhaustive()
    }
}

impl CustomerSession {
    /// Validate the scanned (table, session) pair and start the session
    ///
    /// An invalid pair still yields a session, already in its terminal state.
    pub async fn connect(
        backend: Arc<dyn PosBackend>,
        config: &ClientConfig,
        table_id: i64,
        session_id: impl Into<String>,
    ) -> ClientResult<Self> {
        let session = Self {
            backend,
            table_id,
            session_id: session_id.into(),
            state: RwLock::new(SessionState::Active),
            orders: RwLock::new(None),
            submit_lock: Mutex::new(()),
            mutation_timeout: config.mutation_timeout,
        };
        session.validate().await?;
        Ok(session)
    }

    pub fn table_id(&self) -> i64 {
        self.table_id
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn state(&self) -> SessionState {
        *self.state.read()
    }

    pub fn is_active(&self) -> bool {
        self.state() == SessionState::Active
    }

    /// Last fetched orders
    pub fn cached_orders(&self) -> Option<SessionOrders> {
        self.orders.read().clone()
    }

    /// Ask the server whether this session is still bound to its table
    pub async fn validate(&self) -> ClientResult<SessionValidation> {
        if let SessionState::Invalid(reason) = self.state() {
            return Ok(SessionValidation::invalid(reason));
        }
        let validation = self
            .backend
            .validate_session(self.table_id, &self.session_id)
            .await?;
        if let Some(reason) = validation.reason.filter(|_| !validation.valid) {
            self.invalidate(reason);
        }
        Ok(validation)
    }

    pub async fn catalog(&self) -> ClientResult<Catalog> {
        self.ensure_active()?;
        self.backend.catalog().await
    }

    /// Submit a batch of lines; sold-out lines come back in `rejected`
    pub async fn submit(&self, items: &[OrderSelection]) -> ClientResult<SubmitOrderResponse> {
        let _guard = self.submit_lock.lock().await;
        self.ensure_active()?;

        let response = self
            .track(self.backend.submit_order(&self.session_id, items).await)?;
        if !response.rejected.is_empty() {
            tracing::warn!(
                session_id = %self.session_id,
                rejected = response.rejected.len(),
                "Some lines were not accepted"
            );
        }
        self.refresh_orders().await?;
        Ok(response)
    }

    pub async fn refresh_orders(&self) -> ClientResult<SessionOrders> {
        self.ensure_active()?;
        let orders = self
            .track(self.backend.session_orders(self.table_id, &self.session_id).await)?;
        *self.orders.write() = Some(orders.clone());
        Ok(orders)
    }

    pub async fn call_staff(&self) -> ClientResult<DiningTable> {
        self.call(CallKind::Staff).await
    }

    pub async fn request_bill(&self) -> ClientResult<DiningTable> {
        self.call(CallKind::Bill).await
    }

    async fn call(&self, kind: CallKind) -> ClientResult<DiningTable> {
        self.ensure_active()?;
        self.track(self.backend.call(self.table_id, kind).await)
    }

    /// Customer-initiated checkout; bounded like the staff one
    pub async fn checkout(&self) -> ClientResult<CheckoutSnapshot> {
        let _guard = self.submit_lock.lock().await;
        self.ensure_active()?;

        let call = self.backend.checkout(self.table_id, &self.session_id);
        let result = match tokio::time::timeout(self.mutation_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(ClientError::uncertain("checkout")),
        };
        Ok(self.track(result)?.snapshot)
    }

    fn ensure_active(&self) -> ClientResult<()> {
        match self.state() {
            SessionState::Active => Ok(()),
            SessionState::Invalid(reason) => Err(ClientError::SessionInvalid(reason)),
        }
    }

    /// Enter the terminal state when the server says the session is gone
    fn track<T>(&self, result: ClientResult<T>) -> ClientResult<T> {
        if let Err(ClientError::SessionInvalid(reason)) = &result {
            self.invalidate(*reason);
        }
        result
    }

    fn invalidate(&self, reason: SessionInvalidReason) {
        let mut state = self.state.write();
        if *state == SessionState::Active {
            tracing::info!(
                table_id = self.table_id,
                session_id = %self.session_id,
                %reason,
                "Session is no longer valid"
            );
            *state = SessionState::Invalid(reason);
            *self.orders.write() = None;
        }
    }
}
