use chrono::Utc;

use super::auth::Principal;
use super::domain::{
    new_record_id, ApprovalStatus, Package, PackageDraft, PortfolioDraft, PortfolioItem, Role,
};
use super::error::MarketplaceError;
use crate::store::Store;

/// Portfolio items and bookable packages owned by photographers.
#[derive(Clone)]
pub struct CatalogService {
    store: Store,
}

impl CatalogService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn add_portfolio_item(
        &self,
        principal: &Principal,
        draft: PortfolioDraft,
    ) -> Result<PortfolioItem, MarketplaceError> {
        principal.require_role(
            Role::Photographer,
            "Only photographers can create portfolio items",
        )?;

        let approved = self
            .store
            .bounded(self.store.profiles.get_by_user(&principal.id))
            .await?
            .is_some_and(|profile| profile.approval_status == ApprovalStatus::Approved);
        if !approved {
            return Err(MarketplaceError::Forbidden(
                "Photographer profile not approved".to_string(),
            ));
        }

        let item = PortfolioItem {
            id: new_record_id(),
            photographer_id: principal.id.clone(),
            category: draft.category,
            title: draft.title,
            description: draft.description,
            image_url: draft.image_url,
            created_at: Utc::now(),
        };
        Ok(self.store.bounded(self.store.portfolio.insert(item)).await?)
    }

    pub async fn portfolio_for(
        &self,
        photographer_id: &str,
    ) -> Result<Vec<PortfolioItem>, MarketplaceError> {
        Ok(self
            .store
            .bounded(self.store.portfolio.list_by_photographer(photographer_id))
            .await?)
    }

    pub async fn delete_portfolio_item(
        &self,
        principal: &Principal,
        item_id: &str,
    ) -> Result<(), MarketplaceError> {
        principal.require_role(
            Role::Photographer,
            "Only photographers can delete portfolio items",
        )?;
        let removed = self
            .store
            .bounded(self.store.portfolio.delete(item_id, &principal.id))
            .await?;
        if removed {
            Ok(())
        } else {
            Err(MarketplaceError::NotFound(
                "Portfolio item not found".to_string(),
            ))
        }
    }

    pub async fn create_package(
        &self,
        principal: &Principal,
        draft: PackageDraft,
    ) -> Result<Package, MarketplaceError> {
        principal.require_role(Role::Photographer, "Only photographers can create packages")?;
        if !draft.price.is_finite() || draft.price < 0.0 {
            return Err(MarketplaceError::InvalidArgument(
                "price must be a non-negative amount".to_string(),
            ));
        }

        let package = Package {
            id: new_record_id(),
            photographer_id: principal.id.clone(),
            name: draft.name,
            kind: draft.kind,
            category: draft.category,
            description: draft.description,
            price: draft.price,
            duration: draft.duration,
            deliverables: draft.deliverables,
            created_at: Utc::now(),
        };
        Ok(self.store.bounded(self.store.packages.insert(package)).await?)
    }

    pub async fn packages_for(
        &self,
        photographer_id: &str,
    ) -> Result<Vec<Package>, MarketplaceError> {
        Ok(self
            .store
            .bounded(self.store.packages.list_by_photographer(photographer_id))
            .await?)
    }

    pub async fn delete_package(
        &self,
        principal: &Principal,
        package_id: &str,
    ) -> Result<(), MarketplaceError> {
        principal.require_role(Role::Photographer, "Only photographers can delete packages")?;
        let removed = self
            .store
            .bounded(self.store.packages.delete(package_id, &principal.id))
            .await?;
        if removed {
            Ok(())
        } else {
            Err(MarketplaceError::NotFound("Package not found".to_string()))
        }
    }
}
