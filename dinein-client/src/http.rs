//! HTTP 客户端 - 通过 REST 访问 dine-in server

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::{ApiResponse, PosError};
use shared::models::{Catalog, DiningTable, MenuItem, Notification, SessionValidation};
use shared::order::{CheckoutSnapshot, ItemAction, OrderSelection, SessionOrders};
use shared::request::{
    AvailabilityRequest, BulkItemsRequest, CallRequest, ChangeQuantityRequest, CheckoutRequest,
    ClearTableRequest, NotificationQuery, SubmitOrderRequest,
};
use shared::response::{
    BulkResponse, CheckoutResponse, IssuedSession, ItemResponse, MarkedRead, RemovedItem,
    SubmitOrderResponse,
};
use shared::table::{CallKind, TableActions};

use crate::{ClientConfig, ClientError, ClientResult, PosBackend};

/// 网络 HTTP 客户端
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// 获取基础 URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send(self.client.get(self.url(path))).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(&self, path: &str, body: &B) -> ClientResult<T> {
        self.send(self.client.post(self.url(path)).json(body)).await
    }

    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send(self.client.post(self.url(path))).await
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            // 尝试解析为 API 错误响应
            let body: ApiResponse<serde_json::Value> = serde_json::from_str(&text)
                .map_err(|_| ClientError::InvalidResponse(format!("HTTP {status}: {text}")))?;
            return match body.into_result() {
                Err(err) => Err(err.into()),
                Ok(_) => Err(ClientError::InvalidResponse(format!(
                    "HTTP {status} without an error code"
                ))),
            };
        }

        let body: ApiResponse<T> = serde_json::from_str(&text)?;
        if status == StatusCode::MULTI_STATUS {
            tracing::debug!(code = ?body.code, message = %body.message, "Partial success");
        }
        // 207 也携带 data，部分失败由调用方检查报告
        body.data
            .ok_or_else(|| ClientError::InvalidResponse("missing data".to_string()))
    }
}

#[async_trait]
impl PosBackend for HttpClient {
    async fn list_tables(&self) -> ClientResult<Vec<DiningTable>> {
        self.get("/api/tables").await
    }

    async fn table(&self, table_id: i64) -> ClientResult<DiningTable> {
        self.get(&format!("/api/tables/{table_id}")).await
    }

    async fn actions(&self, table_id: i64) -> ClientResult<TableActions> {
        self.get(&format!("/api/tables/{table_id}/actions")).await
    }

    async fn receipt(&self, table_id: i64) -> ClientResult<CheckoutSnapshot> {
        self.get(&format!("/api/tables/{table_id}/receipt")).await
    }

    async fn issue_session(&self, table_id: i64) -> ClientResult<IssuedSession> {
        self.post_empty(&format!("/api/tables/{table_id}/session"))
            .await
    }

    async fn validate_session(&self, table_id: i64, session_id: &str) -> ClientResult<SessionValidation> {
        self.get(&format!(
            "/api/tables/{table_id}/sessions/{session_id}/validate"
        ))
        .await
    }

    async fn session_orders(&self, table_id: i64, session_id: &str) -> ClientResult<SessionOrders> {
        self.get(&format!("/api/tables/{table_id}/sessions/{session_id}/orders"))
            .await
    }

    async fn submit_order(
        &self,
        session_id: &str,
        items: &[OrderSelection],
    ) -> ClientResult<SubmitOrderResponse> {
        let body = SubmitOrderRequest {
            items: items.to_vec(),
        };
        self.post(&format!("/api/sessions/{session_id}/orders"), &body)
            .await
    }

    async fn item_transition(&self, order_item_id: i64, action: ItemAction) -> ClientResult<ItemResponse> {
        self.post_empty(&format!("/api/items/{order_item_id}/{action}"))
            .await
    }

    async fn change_quantity(&self, order_item_id: i64, quantity: i32) -> ClientResult<ItemResponse> {
        let request = self
            .client
            .patch(self.url(&format!("/api/items/{order_item_id}")))
            .json(&ChangeQuantityRequest { quantity });
        self.send(request).await
    }

    async fn remove_item(&self, order_item_id: i64) -> ClientResult<RemovedItem> {
        let request = self
            .client
            .delete(self.url(&format!("/api/items/{order_item_id}")));
        self.send(request).await
    }

    async fn bulk(
        &self,
        table_id: i64,
        action: ItemAction,
        order_item_ids: Option<Vec<i64>>,
    ) -> ClientResult<BulkResponse> {
        let path = match action {
            ItemAction::Accept => "accept-all",
            ItemAction::Complete => "complete-all",
            ItemAction::Reject => {
                return Err(PosError::Validation("reject has no bulk endpoint".to_string()).into());
            }
        };
        self.post(
            &format!("/api/tables/{table_id}/items/{path}"),
            &BulkItemsRequest { order_item_ids },
        )
        .await
    }

    async fn checkout(&self, table_id: i64, session_id: &str) -> ClientResult<CheckoutResponse> {
        let body = CheckoutRequest {
            session_id: session_id.to_string(),
        };
        self.post(&format!("/api/tables/{table_id}/checkout"), &body)
            .await
    }

    async fn payment_complete(&self, table_id: i64) -> ClientResult<DiningTable> {
        self.post_empty(&format!("/api/tables/{table_id}/payment"))
            .await
    }

    async fn clear_table(&self, table_id: i64, force: bool) -> ClientResult<DiningTable> {
        self.post(
            &format!("/api/tables/{table_id}/clear"),
            &ClearTableRequest { force },
        )
        .await
    }

    async fn call(&self, table_id: i64, kind: CallKind) -> ClientResult<DiningTable> {
        self.post(&format!("/api/tables/{table_id}/call"), &CallRequest { kind })
            .await
    }

    async fn acknowledge_call(&self, table_id: i64) -> ClientResult<DiningTable> {
        self.post_empty(&format!("/api/tables/{table_id}/call/ack"))
            .await
    }

    async fn catalog(&self) -> ClientResult<Catalog> {
        self.get("/api/catalog").await
    }

    async fn set_availability(&self, item_id: i64, available: bool) -> ClientResult<MenuItem> {
        let request = self
            .client
            .put(self.url(&format!("/api/catalog/items/{item_id}/availability")))
            .json(&AvailabilityRequest { available });
        self.send(request).await
    }

    async fn notifications(&self, query: NotificationQuery) -> ClientResult<Vec<Notification>> {
        let request = self.client.get(self.url("/api/notifications")).query(&query);
        self.send(request).await
    }

    async fn mark_read(&self, notification_id: i64) -> ClientResult<Notification> {
        self.post_empty(&format!("/api/notifications/{notification_id}/read"))
            .await
    }

    async fn mark_all_read(&self) -> ClientResult<MarkedRead> {
        self.post_empty("/api/notifications/read-all").await
    }
}
