use serde::{Deserialize, Serialize};
#[cfg(feature = "docs")]
use utoipa::ToSchema;
use validator::Validate;

#[cfg_attr(feature = "docs", derive(ToSchema))]
#[cfg_attr(feature = "docs", schema(
    description = "Metadata attached to the checkout session and echoed back by the payment webhook",
    example = json!({ "user_id": "user_2abcXYZ" })
))]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckoutMetadata {
    #[cfg_attr(feature = "docs", schema(example = "user_2abcXYZ"))]
    #[serde(default)]
    pub user_id: Option<String>,
}

#[cfg_attr(feature = "docs", derive(ToSchema))]
#[cfg_attr(feature = "docs", schema(
    description = "Request to start a hosted checkout for a credit pack. The pack name decides the credits granted after payment: \"Standard\" grants 200, \"Pro\" grants 500. The amount is in the smallest currency unit.",
    example = json!({
        "name": "Pro",
        "amount": 2000,
        "metadata": { "user_id": "user_2abcXYZ" }
    })
))]
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCheckoutRequest {
    #[cfg_attr(feature = "docs", schema(example = "Pro"))]
    #[validate(length(
        min = 1,
        max = 100,
        message = "Product name must be between 1 and 100 characters"
    ))]
    pub name: String,

    #[cfg_attr(feature = "docs", schema(example = 2000, minimum = 1))]
    #[validate(range(min = 1, message = "Amount must be a positive integer"))]
    pub amount: i64,

    #[serde(default)]
    pub metadata: CheckoutMetadata,
}
