//! Contracts for the third-party checkout widgets.
//!
//! Card tokenization and age verification are performed by hosted vendor
//! widgets. The storefront never sees card data or identity documents; it
//! only receives opaque tokens, which are passed on to the order service.

use std::future::Future;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use secrecy::SecretString;
use thiserror::Error;
use tracing::{info, instrument, warn};

/// Details shared with both widgets for one checkout attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    /// Storefront-side reference for the attempt.
    pub reference: String,
    /// Amount to authorize.
    pub amount: Decimal,
    pub currency: String,
    pub customer: CustomerDetails,
}

/// Customer details collected on the checkout form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub date_of_birth: Option<NaiveDate>,
    pub postal_code: String,
}

/// What a widget reports back.
#[derive(Debug)]
pub enum WidgetOutcome {
    /// The widget succeeded and issued an opaque token.
    Success { token: SecretString },
    /// The widget declined or failed.
    Failure { reason: String },
}

/// Hosted payment widget that turns card details into a token.
pub trait PaymentTokenizer {
    fn tokenize(&self, request: &CheckoutRequest) -> impl Future<Output = WidgetOutcome> + Send;
}

/// Hosted age verification widget.
pub trait AgeVerifier {
    fn verify(&self, request: &CheckoutRequest) -> impl Future<Output = WidgetOutcome> + Send;
}

/// Tokens proving a checkout attempt passed both widgets.
#[derive(Debug)]
pub struct CheckoutAuthorization {
    pub reference: String,
    pub age_token: SecretString,
    pub payment_token: SecretString,
}

/// Why a checkout attempt was refused.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("Age verification failed: {0}")]
    AgeVerification(String),

    #[error("Payment failed: {0}")]
    Payment(String),
}

/// Run age verification, then payment tokenization.
///
/// Tokenization is never attempted for a customer who failed age
/// verification.
///
/// # Errors
///
/// Returns the failing widget's reason.
#[instrument(skip_all, fields(reference = %request.reference))]
pub async fn authorize_checkout<A, P>(
    age_verifier: &A,
    tokenizer: &P,
    request: &CheckoutRequest,
) -> Result<CheckoutAuthorization, CheckoutError>
where
    A: AgeVerifier + Sync,
    P: PaymentTokenizer + Sync,
{
    let age_token = match age_verifier.verify(request).await {
        WidgetOutcome::Success { token } => token,
        WidgetOutcome::Failure { reason } => {
            warn!(reason = %reason, "Age verification declined");
            return Err(CheckoutError::AgeVerification(reason));
        }
    };

    let payment_token = match tokenizer.tokenize(request).await {
        WidgetOutcome::Success { token } => token,
        WidgetOutcome::Failure { reason } => {
            warn!(reason = %reason, "Payment tokenization declined");
            return Err(CheckoutError::Payment(reason));
        }
    };

    info!("Checkout authorized");

    Ok(CheckoutAuthorization {
        reference: request.reference.clone(),
        age_token,
        payment_token,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use secrecy::ExposeSecret;

    use super::*;

    struct FakeWidget {
        token: Option<&'static str>,
        calls: AtomicUsize,
    }

    impl FakeWidget {
        const fn approving(token: &'static str) -> Self {
            Self {
                token: Some(token),
                calls: AtomicUsize::new(0),
            }
        }

        const fn declining() -> Self {
            Self {
                token: None,
                calls: AtomicUsize::new(0),
            }
        }

        fn outcome(&self) -> WidgetOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.token {
                Some(token) => WidgetOutcome::Success {
                    token: SecretString::from(token),
                },
                None => WidgetOutcome::Failure {
                    reason: "declined".to_string(),
                },
            }
        }
    }

    impl PaymentTokenizer for FakeWidget {
        async fn tokenize(&self, _request: &CheckoutRequest) -> WidgetOutcome {
            self.outcome()
        }
    }

    impl AgeVerifier for FakeWidget {
        async fn verify(&self, _request: &CheckoutRequest) -> WidgetOutcome {
            self.outcome()
        }
    }

    fn request() -> CheckoutRequest {
        CheckoutRequest {
            reference: "chk_1001".to_string(),
            amount: Decimal::new(4999, 2),
            currency: "USD".to_string(),
            customer: CustomerDetails {
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                date_of_birth: NaiveDate::from_ymd_opt(1990, 12, 10),
                postal_code: "90210".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_both_widgets_succeed() {
        let age = FakeWidget::approving("age_tok");
        let pay = FakeWidget::approving("pay_tok");

        let auth = authorize_checkout(&age, &pay, &request()).await.unwrap();

        assert_eq!(auth.reference, "chk_1001");
        assert_eq!(auth.age_token.expose_secret(), "age_tok");
        assert_eq!(auth.payment_token.expose_secret(), "pay_tok");
    }

    #[tokio::test]
    async fn test_age_failure_skips_payment() {
        let age = FakeWidget::declining();
        let pay = FakeWidget::approving("pay_tok");

        let err = authorize_checkout(&age, &pay, &request())
            .await
            .unwrap_err();

        assert_eq!(err, CheckoutError::AgeVerification("declined".to_string()));
        assert_eq!(pay.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_payment_failure_after_age_success() {
        let age = FakeWidget::approving("age_tok");
        let pay = FakeWidget::declining();

        let err = authorize_checkout(&age, &pay, &request())
            .await
            .unwrap_err();

        assert_eq!(err, CheckoutError::Payment("declined".to_string()));
        assert_eq!(age.calls.load(Ordering::SeqCst), 1);
    }
}
