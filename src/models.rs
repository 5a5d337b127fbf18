//! Entity shapes returned by the API and carried in webhook payloads.
//!
//! Every field is optional on the wire: missing fields and explicit `null`s
//! both take the field's default value. Unknown fields are ignored so newer
//! API versions keep decoding.

use serde::{Deserialize, Serialize};
use serde_with::{DefaultOnNull, serde_as};

/// An invoice.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Invoice {
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub id: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub user_id: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub assigned_user_id: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub client_id: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub status_id: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub number: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub po_number: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub terms: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub public_notes: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub private_notes: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub footer: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub custom_value1: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub custom_value2: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub custom_value3: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub custom_value4: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub tax_name1: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub tax_name2: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub tax_name3: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub tax_rate1: f64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub tax_rate2: f64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub tax_rate3: f64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub total_taxes: f64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub amount: f64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub balance: f64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub paid_to_date: f64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub discount: f64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub partial_due_date: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub due_date: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub date: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub line_items: Vec<LineItem>,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub is_deleted: bool,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub updated_at: i64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub archived_at: i64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub created_at: i64,
}

/// A line item on an invoice or credit.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineItem {
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub quantity: f64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub cost: f64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub product_key: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub notes: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub discount: f64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub is_amount_discount: bool,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub tax_name1: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub tax_rate1: f64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub tax_name2: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub tax_rate2: f64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub tax_name3: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub tax_rate3: f64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub custom_value1: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub custom_value2: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub custom_value3: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub custom_value4: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub type_id: String,
}

/// A payment.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Payment {
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub id: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub client_id: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub invitation_id: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub client_contact_id: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub user_id: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub type_id: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub date: String,
    #[serde(rename = "transaction_reference")]
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub transaction_ref: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub assigned_user_id: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub private_notes: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub is_manual: bool,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub is_deleted: bool,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub amount: f64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub refunded: f64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub updated_at: i64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub archived_at: i64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub company_gateway_id: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub number: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub category_id: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub custom_value1: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub custom_value2: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub custom_value3: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub custom_value4: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub exchange_currency_id: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub exchange_rate: f64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub idempotency_key: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub paymentables: Vec<Paymentable>,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub invoices: Vec<PaymentInvoice>,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub credits: Vec<PaymentCredit>,
}

/// An invoice a payment is applied to.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentInvoice {
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub invoice_id: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub amount: f64,
}

/// A credit a payment is applied to.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentCredit {
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub credit_id: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub amount: f64,
}

/// An invoice or credit attached to a payment.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Paymentable {
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub id: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub invoice_id: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub credit_id: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub refunded: f64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub amount: f64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub updated_at: i64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub created_at: i64,
}

/// A client (customer) record.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Client {
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub id: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub user_id: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub assigned_user_id: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub name: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub website: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub private_notes: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub public_notes: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub balance: f64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub paid_to_date: f64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub credit_balance: f64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub phone: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub address1: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub address2: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub city: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub state: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub postal_code: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub country_id: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub industry_id: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub custom_value1: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub custom_value2: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub custom_value3: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub custom_value4: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub vat_number: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub id_number: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub number: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub shipping_address1: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub shipping_address2: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub shipping_city: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub shipping_state: String,
    #[serde(rename = "shipping_postal_code")]
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub shipping_postal: String,
    #[serde(rename = "shipping_country_id")]
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub shipping_country: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub is_deleted: bool,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub contacts: Vec<ClientContact>,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub updated_at: i64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub archived_at: i64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub created_at: i64,
}

impl Client {
    /// Returns the contact flagged as primary, if any.
    #[must_use]
    pub fn primary_contact(&self) -> Option<&ClientContact> {
        self.contacts.iter().find(|c| c.is_primary)
    }
}

/// A contact person of a client.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientContact {
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub id: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub first_name: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub last_name: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub email: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub phone: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub is_primary: bool,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub custom_value1: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub custom_value2: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub custom_value3: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub custom_value4: String,
}

/// A credit note.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credit {
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub id: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub user_id: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub assigned_user_id: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub client_id: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub status_id: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub invoice_id: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub number: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub po_number: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub terms: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub public_notes: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub private_notes: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub footer: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub custom_value1: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub custom_value2: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub custom_value3: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub custom_value4: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub tax_name1: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub tax_name2: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub tax_name3: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub tax_rate1: f64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub tax_rate2: f64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub tax_rate3: f64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub total_taxes: f64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub amount: f64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub balance: f64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub paid_to_date: f64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub discount: f64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub partial: f64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub is_amount_discount: bool,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub is_deleted: bool,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub uses_inclusive_taxes: bool,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub date: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub last_sent_date: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub next_send_date: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub partial_due_date: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub due_date: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub line_items: Vec<LineItem>,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub updated_at: i64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub archived_at: i64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub created_at: i64,
}

/// Metadata attached to list responses.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Meta {
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub pagination: Pagination,
}

/// Pagination details of a list response.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pagination {
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub total: u64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub count: u64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub per_page: u64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub current_page: u64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub total_pages: u64,
    pub links: Option<Links>,
}

impl Pagination {
    /// Returns true if pages follow the current one.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}

/// Links to neighbouring pages.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Links {
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub next: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub previous: String,
}

/// Envelope of list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub meta: Meta,
}

/// Envelope of single-entity endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SingleResponse<T> {
    pub data: T,
}
