pub mod payment_links;
pub mod shop_currency;
pub mod shops;

use paylink_sdk::objects::PaymentStatus as SdkPaymentStatus;

/// Payment status for database operations.
///
/// This is the sqlx::Type version, stored as lowercase TEXT. For API/DTO
/// use, see `paylink_sdk::objects::PaymentStatus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Success,
    Failed,
}

impl From<PaymentStatus> for SdkPaymentStatus {
    fn from(value: PaymentStatus) -> Self {
        match value {
            PaymentStatus::Pending => SdkPaymentStatus::Pending,
            PaymentStatus::Success => SdkPaymentStatus::Success,
            PaymentStatus::Failed => SdkPaymentStatus::Failed,
        }
    }
}

impl From<SdkPaymentStatus> for PaymentStatus {
    fn from(value: SdkPaymentStatus) -> Self {
        match value {
            SdkPaymentStatus::Pending => PaymentStatus::Pending,
            SdkPaymentStatus::Success => PaymentStatus::Success,
            SdkPaymentStatus::Failed => PaymentStatus::Failed,
        }
    }
}
