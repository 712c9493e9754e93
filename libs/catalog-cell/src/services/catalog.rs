use std::collections::BTreeSet;

use anyhow::{anyhow, Result};
use reqwest::Method;
use serde::Deserialize;
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{Service, ServiceInput, ServiceSearchQuery, Stylist, StylistInput};

pub struct CatalogService {
    supabase: SupabaseClient,
}

#[derive(Deserialize)]
struct CategoryRow {
    category: Option<String>,
}

impl CatalogService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Catalog writes go through the service-role key.
    pub fn for_admin(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::privileged(config),
        }
    }

    /// Services filtered by a case-insensitive name fragment and an exact category.
    pub async fn search_services(&self, query: &ServiceSearchQuery) -> Result<Vec<Service>> {
        let mut path = "/rest/v1/services?order=name.asc".to_string();

        if let Some(q) = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            path.push_str(&format!("&name=ilike.*{}*", urlencoding::encode(q)));
        }
        if let Some(category) = query.category.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            path.push_str(&format!("&category=eq.{}", urlencoding::encode(category)));
        }

        debug!("Searching services: {}", path);
        let services: Vec<Service> = self.supabase.request(Method::GET, &path, None).await?;
        Ok(services)
    }

    pub async fn get_service(&self, service_id: i64) -> Result<Option<Service>> {
        let path = format!("/rest/v1/services?id=eq.{}", service_id);
        let services: Vec<Service> = self.supabase.request(Method::GET, &path, None).await?;
        Ok(services.into_iter().next())
    }

    /// Distinct non-empty categories, sorted.
    pub async fn list_categories(&self) -> Result<Vec<String>> {
        let rows: Vec<CategoryRow> = self.supabase
            .request(Method::GET, "/rest/v1/services?select=category", None)
            .await?;

        let categories: BTreeSet<String> = rows
            .into_iter()
            .filter_map(|row| row.category)
            .filter(|c| !c.trim().is_empty())
            .collect();

        Ok(categories.into_iter().collect())
    }

    pub async fn list_stylists(&self) -> Result<Vec<Stylist>> {
        let stylists: Vec<Stylist> = self.supabase
            .request(Method::GET, "/rest/v1/stylists?order=name.asc", None)
            .await?;
        Ok(stylists)
    }

    pub async fn create_service(&self, input: &ServiceInput) -> Result<Service> {
        let rows: Vec<Service> = self.supabase
            .returning(Method::POST, "/rest/v1/services", input.to_row())
            .await?;

        let service = rows.into_iter().next()
            .ok_or_else(|| anyhow!("Service insert returned no rows"))?;
        info!("Created service {} ({})", service.id, service.name);
        Ok(service)
    }

    /// Returns `None` when no service has the given id.
    pub async fn update_service(&self, service_id: i64, input: &ServiceInput) -> Result<Option<Service>> {
        let path = format!("/rest/v1/services?id=eq.{}", service_id);
        let rows: Vec<Service> = self.supabase
            .returning(Method::PATCH, &path, input.to_row())
            .await?;

        if let Some(service) = rows.first() {
            info!("Updated service {}", service.id);
        }
        Ok(rows.into_iter().next())
    }

    pub async fn delete_service(&self, service_id: i64) -> Result<()> {
        let path = format!("/rest/v1/services?id=eq.{}", service_id);
        self.supabase.execute(Method::DELETE, &path, None).await?;
        info!("Deleted service {}", service_id);
        Ok(())
    }

    pub async fn create_stylist(&self, input: &StylistInput) -> Result<Stylist> {
        let rows: Vec<Stylist> = self.supabase
            .returning(Method::POST, "/rest/v1/stylists", input.to_row())
            .await?;

        let stylist = rows.into_iter().next()
            .ok_or_else(|| anyhow!("Stylist insert returned no rows"))?;
        info!("Created stylist {} ({})", stylist.id, stylist.name);
        Ok(stylist)
    }

    pub async fn update_stylist(&self, stylist_id: i64, input: &StylistInput) -> Result<Option<Stylist>> {
        let path = format!("/rest/v1/stylists?id=eq.{}", stylist_id);
        let rows: Vec<Stylist> = self.supabase
            .returning(Method::PATCH, &path, input.to_row())
            .await?;
        Ok(rows.into_iter().next())
    }

    pub async fn delete_stylist(&self, stylist_id: i64) -> Result<()> {
        let path = format!("/rest/v1/stylists?id=eq.{}", stylist_id);
        self.supabase.execute(Method::DELETE, &path, None).await?;
        info!("Deleted stylist {}", stylist_id);
        Ok(())
    }
}
