/// Opens a checkout at the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrepareRequest {
    pub partner_order_id: String,
    pub partner_user_id: String,
    pub item_name: String,
    pub quantity: i32,
    pub total_amount: i64,
    pub tax_free_amount: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApproveRequest {
    pub tid: String,
    pub pg_token: String,
    pub partner_order_id: String,
    pub partner_user_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelRequest {
    pub tid: String,
    pub cancel_amount: i64,
    pub cancel_tax_free_amount: i64,
    /// Remaining cancelable total as recorded locally.
    pub cancel_available_amount: i64,
}
