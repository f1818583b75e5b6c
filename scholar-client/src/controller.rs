//! Generic list/detail/create/edit/delete controller.
//!
//! One instance per page. It combines a resource's endpoints with the shared
//! cache: the current filters pick the key, reads go through the cache, and
//! every write invalidates the resource's affected prefixes.

use crate::api_client::ApiClient;
use crate::filter::{FilterSet, FilterState};
use crate::mutation::Mutation;
use crate::query::{QueryCache, QueryKey, QueryState};
use crate::resources::{DraftInput, Resource};

type Items<R> = Vec<<R as Resource>::Item>;

pub struct ResourceController<R: Resource> {
    api: ApiClient,
    cache: QueryCache,
    filters: FilterState,
    create: Mutation<DraftInput<R>, R::Item>,
    update: Mutation<(R::Id, DraftInput<R>), R::Item>,
    delete: Mutation<R::Id, ()>,
    secondary: Mutation<R::Id, ()>,
}

impl<R: Resource> Clone for ResourceController<R> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            cache: self.cache.clone(),
            filters: self.filters.clone(),
            create: self.create.clone(),
            update: self.update.clone(),
            delete: self.delete.clone(),
            secondary: self.secondary.clone(),
        }
    }
}

impl<R: Resource> std::fmt::Debug for ResourceController<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceController")
            .field("resource", &R::NAME)
            .field("key", &self.query_key())
            .finish()
    }
}

impl<R: Resource> ResourceController<R> {
    pub fn new(api: ApiClient, cache: QueryCache) -> Self {
        let affected = R::affected();

        let create = {
            let api = api.clone();
            Mutation::new(cache.clone(), "create", R::LABEL, move |input: DraftInput<R>| {
                R::create(api.clone(), input)
            })
            .invalidates_all(affected.clone())
        };
        let update = {
            let api = api.clone();
            Mutation::new(cache.clone(), "update", R::LABEL, move |(id, input): (R::Id, DraftInput<R>)| {
                R::update(api.clone(), id, input)
            })
            .invalidates_all(affected.clone())
        };
        let delete = {
            let api = api.clone();
            Mutation::new(cache.clone(), "delete", R::LABEL, move |id: R::Id| R::delete(api.clone(), id))
                .invalidates_all(affected.clone())
        };
        let secondary = {
            let api = api.clone();
            let verb = R::SECONDARY.unwrap_or("update");
            Mutation::new(cache.clone(), verb, R::LABEL, move |id: R::Id| R::secondary(api.clone(), id))
                .invalidates_all(affected)
        };

        Self {
            filters: FilterState::new(R::key()),
            api,
            cache,
            create,
            update,
            delete,
            secondary,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn query_key(&self) -> QueryKey {
        self.filters.query_key()
    }

    pub fn filters(&self) -> &FilterSet {
        self.filters.filters()
    }

    /// Returns `true` when the key changed. The next [`read`](Self::read)
    /// then loads the new key while the old one stays cached.
    pub fn set_filter(&mut self, name: &str, value: &str) -> bool {
        self.filters.set_filter(name, value)
    }

    pub fn clear_filters(&mut self) -> bool {
        self.filters.clear()
    }

    pub fn read(&self) -> QueryState<Items<R>> {
        let api = self.api.clone();
        let filters = self.filters.filters().clone();
        self.cache
            .read(&self.query_key(), move || R::list(api, filters))
    }

    /// Read and wait until the current key settles.
    pub async fn fetch(&self) -> QueryState<Items<R>> {
        let api = self.api.clone();
        let filters = self.filters.filters().clone();
        self.cache
            .fetch(&self.query_key(), move || R::list(api, filters))
            .await
    }

    /// Retry after an error, or a manual refresh.
    pub fn refetch(&self) -> QueryState<Items<R>> {
        let api = self.api.clone();
        let filters = self.filters.filters().clone();
        self.cache
            .refetch(&self.query_key(), move || R::list(api, filters))
    }

    pub fn create(&self) -> &Mutation<DraftInput<R>, R::Item> {
        &self.create
    }

    pub fn update(&self) -> &Mutation<(R::Id, DraftInput<R>), R::Item> {
        &self.update
    }

    pub fn delete(&self) -> &Mutation<R::Id, ()> {
        &self.delete
    }

    /// The resource's extra row action (approve, complete). Fails with
    /// `Unsupported` for resources that declare none.
    pub fn secondary(&self) -> &Mutation<R::Id, ()> {
        &self.secondary
    }

    /// True while any write for this page is in flight.
    pub fn is_busy(&self) -> bool {
        self.create.is_pending()
            || self.update.is_pending()
            || self.delete.is_pending()
            || self.secondary.is_pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::resources::Students;
    use crate::session::SessionService;

    fn controller() -> ResourceController<Students> {
        let config = ClientConfig {
            api_base_url: "http://localhost:3000/api".into(),
            request_timeout_ms: 5_000,
            upload_timeout_ms: crate::config::DEFAULT_UPLOAD_TIMEOUT_MS,
            session_path: "session.json".into(),
        };
        let api = ApiClient::new(&config, SessionService::in_memory()).unwrap();
        ResourceController::new(api, QueryCache::new())
    }

    #[test]
    fn filters_drive_the_query_key() {
        let mut students = controller();
        assert_eq!(students.query_key().to_string(), "students");

        assert!(students.set_filter("yearGroupId", "Y7"));
        assert_eq!(students.query_key().to_string(), "students/yearGroupId=Y7");

        assert!(!students.set_filter("yearGroupId", "Y7"));
        assert!(students.set_filter("yearGroupId", ""));
        assert_eq!(students.query_key(), Students::key());
    }

    #[test]
    fn mutations_use_resource_label() {
        let students = controller();
        assert_eq!(students.create().verb(), "create");
        assert_eq!(students.delete().resource(), "student");
        assert!(!students.is_busy());
    }
}
