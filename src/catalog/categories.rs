use super::Catalog;
use crate::config::DEFAULT_LANGUAGE;
use crate::error::{AdminError, AdminResult};
use crate::store::StoreError;
use crate::types::{Category, CategoryId};

/// Trimmed key and label, both required
fn validate_category(key: &str, label: &str) -> AdminResult<(String, String)> {
    let key = key.trim();
    let label = label.trim();
    if key.is_empty() {
        return Err(AdminError::Validation("Category key is required".to_string()));
    }
    if label.is_empty() {
        return Err(AdminError::Validation("Category label is required".to_string()));
    }
    Ok((key.to_string(), label.to_string()))
}

impl Catalog {
    pub async fn get_category(&self, id: CategoryId) -> AdminResult<Category> {
        self.categories
            .get_category(id)
            .await?
            .ok_or_else(|| AdminError::NotFound(format!("category {}", id)))
    }

    /// Every category in creation order
    pub async fn all_categories(&self) -> AdminResult<Vec<Category>> {
        Ok(self.categories.list_categories(usize::MAX, 0).await?)
    }

    pub async fn create_category(
        &self,
        key: &str,
        label: &str,
        icon: &str,
    ) -> AdminResult<Category> {
        let (key, label) = validate_category(key, label)?;
        let category = self
            .categories
            .create_category(key, label, icon.trim().to_string())
            .await?;
        tracing::info!("Created category {} ({})", category.id, category.key);
        Ok(category)
    }

    pub async fn update_category(
        &self,
        id: CategoryId,
        key: &str,
        label: &str,
        icon: &str,
    ) -> AdminResult<Category> {
        let (key, label) = validate_category(key, label)?;
        match self
            .categories
            .update_category(id, key, label, icon.trim().to_string())
            .await
        {
            Ok(category) => {
                tracing::info!("Updated category {}", id);
                Ok(category)
            }
            Err(StoreError::NotFound(_)) => Err(AdminError::NotFound(format!("category {}", id))),
            Err(e) => Err(e.into()),
        }
    }

    /// Hard delete. Questions in the category keep their dangling reference.
    pub async fn delete_category(&self, id: CategoryId) -> AdminResult<()> {
        if !self.categories.delete_category(id).await? {
            return Err(AdminError::NotFound(format!("category {}", id)));
        }

        let remaining = self
            .questions
            .question_counts_by_category(DEFAULT_LANGUAGE)
            .await?
            .get(&id)
            .copied()
            .unwrap_or(0);
        if remaining > 0 {
            tracing::warn!(
                "Deleted category {} which still has {} questions",
                id,
                remaining
            );
        } else {
            tracing::info!("Deleted category {}", id);
        }
        Ok(())
    }
}
