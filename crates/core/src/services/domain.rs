//! Domain availability and pricing.
//!
//! Availability is simulated: a deterministic digest of the full name stands
//! in for a registrar call, so the same query always gets the same answer.
//! Checking a domain never writes anything; the workflow records whatever
//! domain the client eventually submits.

use salonkit_common::{AppError, AppResult};
use salonkit_db::entities::domain_pricing;
use salonkit_db::repositories::DomainPricingRepository;
use serde::Serialize;

/// Result of an availability check.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainCheck {
    pub domain: String,
    pub extension: String,
    pub available: bool,
    /// Price charged to the customer, in cents.
    pub user_price: i64,
}

/// Service for domain pricing and simulated availability.
#[derive(Clone)]
pub struct DomainService {
    pricing_repo: DomainPricingRepository,
}

impl DomainService {
    /// Create a new domain service.
    #[must_use]
    pub const fn new(pricing_repo: DomainPricingRepository) -> Self {
        Self { pricing_repo }
    }

    /// Check a name against the pricing table and the simulated registrar.
    pub async fn check(&self, domain: &str, extension: &str) -> AppResult<DomainCheck> {
        let domain = domain.trim().to_lowercase();
        if !is_valid_label(&domain) {
            return Err(AppError::Validation(
                "Domain may only contain letters, digits and hyphens".to_string(),
            ));
        }

        let pricing = self
            .pricing_repo
            .find_by_extension(extension)
            .await?
            .filter(|p| p.is_active)
            .ok_or_else(|| {
                AppError::NotFound(format!("Extension {extension} is not offered"))
            })?;

        Ok(DomainCheck {
            available: simulated_availability(&domain, extension),
            domain,
            extension: extension.to_string(),
            user_price: pricing.user_price,
        })
    }

    /// The active pricing table.
    pub async fn pricing(&self) -> AppResult<Vec<domain_pricing::Model>> {
        self.pricing_repo.find_active().await
    }
}

/// Deterministic stand-in for a registrar lookup: roughly three out of four
/// names come back available.
fn simulated_availability(domain: &str, extension: &str) -> bool {
    let digest = md5::compute(format!("{domain}{extension}").as_bytes());
    digest[0] % 4 != 0
}

fn is_valid_label(domain: &str) -> bool {
    !domain.is_empty()
        && domain.len() <= 63
        && !domain.starts_with('-')
        && !domain.ends_with('-')
        && domain
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulated_availability_is_deterministic() {
        let first = simulated_availability("salon-lumiere", ".fr");
        for _ in 0..10 {
            assert_eq!(simulated_availability("salon-lumiere", ".fr"), first);
        }
    }

    #[test]
    fn test_simulated_availability_depends_on_extension() {
        // Not a strict requirement for any particular name, but the digest
        // covers the full name including the extension.
        let names = ["chezmarie", "coiffure-du-parc", "studio54", "hairline"];
        let differs = names.iter().any(|name| {
            simulated_availability(name, ".fr") != simulated_availability(name, ".com")
        });
        assert!(differs);
    }

    #[test]
    fn test_is_valid_label() {
        assert!(is_valid_label("salon-lumiere"));
        assert!(is_valid_label("studio54"));
        assert!(!is_valid_label(""));
        assert!(!is_valid_label("-salon"));
        assert!(!is_valid_label("salon-"));
        assert!(!is_valid_label("salon lumiere"));
        assert!(!is_valid_label("salon.lumiere"));
    }
}
