use serde::{Deserialize, Serialize};

use stockline_core::{DomainError, DomainResult, Sku, UserId};

/// One line of a raw order submission, as received from the caller.
///
/// `name` and `price_hint` are advisory only; trusted values always come from
/// the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequestLine {
    pub sku: String,
    pub qty: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_hint: Option<f64>,
}

impl OrderRequestLine {
    pub fn new(sku: impl Into<String>, qty: i64) -> Self {
        Self {
            sku: sku.into(),
            qty,
            name: None,
            price_hint: None,
        }
    }
}

/// Total quantity requested for one SKU after merging duplicate lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestedQuantity {
    pub sku: Sku,
    pub quantity: i64,
}

/// Merged `sku -> quantity` request.
///
/// SKUs keep the order of their first appearance in the raw submission, so
/// order lines read the way the customer entered them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    lines: Vec<RequestedQuantity>,
}

impl OrderRequest {
    /// Validate and merge raw lines by summation.
    ///
    /// Rejects an empty submission, blank SKUs and non-positive quantities.
    /// Nothing is silently skipped: a single bad line fails the whole request.
    pub fn merge(raw: &[OrderRequestLine]) -> DomainResult<Self> {
        if raw.is_empty() {
            return Err(DomainError::validation("items are required"));
        }

        let mut lines: Vec<RequestedQuantity> = Vec::with_capacity(raw.len());
        for (idx, line) in raw.iter().enumerate() {
            let sku = Sku::parse(&line.sku)
                .map_err(|_| DomainError::validation(format!("item {idx}: sku is required")))?;
            if line.qty <= 0 {
                return Err(DomainError::validation(format!(
                    "item {idx}: quantity for {sku} must be positive (got {})",
                    line.qty
                )));
            }

            match lines.iter_mut().find(|l| l.sku == sku) {
                Some(existing) => {
                    existing.quantity = existing.quantity.checked_add(line.qty).ok_or_else(|| {
                        DomainError::validation(format!("quantity for {sku} is too large"))
                    })?;
                }
                None => lines.push(RequestedQuantity {
                    sku,
                    quantity: line.qty,
                }),
            }
        }

        Ok(Self { lines })
    }

    pub fn lines(&self) -> &[RequestedQuantity] {
        &self.lines
    }

    pub fn skus(&self) -> Vec<Sku> {
        self.lines.iter().map(|l| l.sku.clone()).collect()
    }

    pub fn quantity_of(&self, sku: &Sku) -> Option<i64> {
        self.lines.iter().find(|l| &l.sku == sku).map(|l| l.quantity)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Free-text delivery details captured with the order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingInfo {
    #[serde(default)]
    pub shipping_address: String,
    #[serde(default)]
    pub contact_info: String,
}

impl ShippingInfo {
    pub fn new(shipping_address: Option<String>, contact_info: Option<String>) -> Self {
        Self {
            shipping_address: shipping_address.unwrap_or_default().trim().to_string(),
            contact_info: contact_info.unwrap_or_default().trim().to_string(),
        }
    }
}

/// Inbound order submission.
///
/// The user id is authenticated upstream and arrives as a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrder {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub items: Vec<OrderRequestLine>,
    #[serde(default)]
    pub shipping_address: Option<String>,
    #[serde(default)]
    pub contact_info: Option<String>,
}

impl PlaceOrder {
    /// Validate everything that can be checked without touching storage.
    pub fn validate(&self) -> DomainResult<(UserId, OrderRequest, ShippingInfo)> {
        let raw_user = self.user_id.trim();
        if raw_user.is_empty() {
            return Err(DomainError::validation("userId is required"));
        }
        let user_id = raw_user
            .parse::<UserId>()
            .map_err(|_| DomainError::validation(format!("userId '{raw_user}' is not a valid id")))?;
        let request = OrderRequest::merge(&self.items)?;
        let shipping = ShippingInfo::new(self.shipping_address.clone(), self.contact_info.clone());
        Ok((user_id, request, shipping))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn place_order(user_id: &str, items: Vec<OrderRequestLine>) -> PlaceOrder {
        PlaceOrder {
            user_id: user_id.to_string(),
            items,
            shipping_address: None,
            contact_info: None,
        }
    }

    #[test]
    fn blank_user_id_is_rejected() {
        let err = place_order("  ", vec![OrderRequestLine::new("BRK-001", 1)])
            .validate()
            .unwrap_err();
        match err {
            DomainError::Validation(msg) if msg.contains("userId") => {}
            _ => panic!("Expected validation error for blank user id"),
        }
    }

    #[test]
    fn malformed_user_id_is_a_validation_error() {
        let err = place_order("not-a-uuid", vec![OrderRequestLine::new("BRK-001", 1)])
            .validate()
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn submission_deserializes_from_wire_shape() {
        let user = UserId::new();
        let body = format!(
            r#"{{"userId":"{user}","items":[{{"sku":"BRK-001","qty":2}}],"shippingAddress":"Abay 10"}}"#
        );
        let cmd: PlaceOrder = serde_json::from_str(&body).unwrap();
        let (user_id, request, shipping) = cmd.validate().unwrap();

        assert_eq!(user_id, user);
        assert_eq!(request.len(), 1);
        assert_eq!(shipping.shipping_address, "Abay 10");
        assert_eq!(shipping.contact_info, "");
    }

    #[test]
    fn duplicate_lines_are_summed_in_first_appearance_order() {
        let raw = vec![
            OrderRequestLine::new("OIL-200", 2),
            OrderRequestLine::new("BRK-001", 1),
            OrderRequestLine::new(" OIL-200 ", 3),
        ];
        let req = OrderRequest::merge(&raw).unwrap();

        assert_eq!(req.len(), 2);
        assert_eq!(req.lines()[0].sku.as_str(), "OIL-200");
        assert_eq!(req.lines()[0].quantity, 5);
        assert_eq!(req.lines()[1].sku.as_str(), "BRK-001");
        assert_eq!(req.lines()[1].quantity, 1);
    }

    #[test]
    fn empty_submission_is_rejected() {
        let err = OrderRequest::merge(&[]).unwrap_err();
        match err {
            DomainError::Validation(msg) if msg.contains("items are required") => {}
            _ => panic!("Expected validation error for empty items"),
        }
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let err = OrderRequest::merge(&[OrderRequestLine::new("BRK-001", 0)]).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn negative_quantity_is_rejected_even_if_sum_is_positive() {
        let raw = vec![
            OrderRequestLine::new("BRK-001", 5),
            OrderRequestLine::new("BRK-001", -2),
        ];
        assert!(OrderRequest::merge(&raw).is_err());
    }

    #[test]
    fn blank_sku_is_rejected() {
        let err = OrderRequest::merge(&[OrderRequestLine::new("  ", 1)]).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn advisory_fields_deserialize_but_are_optional() {
        let line: OrderRequestLine =
            serde_json::from_str(r#"{"sku":"BRK-001","qty":2,"priceHint":1.0}"#).unwrap();
        assert_eq!(line.price_hint, Some(1.0));
        assert_eq!(line.name, None);
    }

    #[test]
    fn shipping_info_trims_and_defaults() {
        let info = ShippingInfo::new(Some("  Abay 10 ".to_string()), None);
        assert_eq!(info.shipping_address, "Abay 10");
        assert_eq!(info.contact_info, "");
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: merging preserves the total requested quantity per SKU.
        #[test]
        fn merge_preserves_per_sku_totals(
            raw in prop::collection::vec((0usize..4, 1i64..1_000i64), 1..20)
        ) {
            let skus = ["BRK-001", "OIL-200", "FLT-010", "SPK-300"];
            let lines: Vec<OrderRequestLine> = raw
                .iter()
                .map(|(i, q)| OrderRequestLine::new(skus[*i], *q))
                .collect();

            let req = OrderRequest::merge(&lines).unwrap();

            for sku in skus {
                let expected: i64 = raw
                    .iter()
                    .filter(|(i, _)| skus[*i] == sku)
                    .map(|(_, q)| *q)
                    .sum();
                let got = req.quantity_of(&Sku::parse(sku).unwrap()).unwrap_or(0);
                prop_assert_eq!(got, expected);
            }

            let distinct = {
                let mut seen: Vec<usize> = raw.iter().map(|(i, _)| *i).collect();
                seen.sort_unstable();
                seen.dedup();
                seen.len()
            };
            prop_assert_eq!(req.len(), distinct);
        }
    }
}
