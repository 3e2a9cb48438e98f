//! Categories hook: user-scoped CRUD, list ordered by name server-side,
//! wholesale refetch on any categories change event.

use std::sync::Arc;

use api_types::category::{CategoryCreate, CategoryCreated, CategoryUpdate, CategoryView};
use api_types::events::WatchedTable;
use tokio::sync::watch;
use uuid::Uuid;

use crate::{ApiClient, ChangeFeed, ResultClient, SubscriptionGuard};

#[derive(Clone, Debug, Default)]
pub struct CategoriesState {
    pub loading: bool,
    pub error: Option<String>,
    pub categories: Vec<CategoryView>,
}

struct Inner {
    api: ApiClient,
    state: watch::Sender<CategoriesState>,
}

impl Inner {
    async fn refetch(&self) {
        let next = match self.api.categories().await {
            Ok(list) => CategoriesState {
                loading: false,
                error: None,
                categories: list.categories,
            },
            Err(err) => CategoriesState {
                loading: false,
                error: Some(err.human_message()),
                ..Default::default()
            },
        };

        let _ = self.state.send(next);
    }
}

pub struct CategoriesHook {
    inner: Arc<Inner>,
    subscription: Option<SubscriptionGuard>,
}

impl CategoriesHook {
    pub fn new(api: ApiClient) -> Self {
        let (state, _) = watch::channel(CategoriesState {
            loading: true,
            ..Default::default()
        });

        Self {
            inner: Arc::new(Inner { api, state }),
            subscription: None,
        }
    }

    pub async fn mount(&mut self, feed: &ChangeFeed) {
        self.inner.refetch().await;

        let inner = Arc::clone(&self.inner);
        self.subscription = Some(feed.watch_tables(&[WatchedTable::Categories], move || {
            let inner = Arc::clone(&inner);
            async move { inner.refetch().await }
        }));
    }

    pub async fn refetch(&self) {
        self.inner.refetch().await;
    }

    pub fn state(&self) -> CategoriesState {
        self.inner.state.borrow().clone()
    }

    pub fn watch(&self) -> watch::Receiver<CategoriesState> {
        self.inner.state.subscribe()
    }

    pub async fn create(&self, payload: &CategoryCreate) -> ResultClient<CategoryCreated> {
        let created = self.inner.api.create_category(payload).await?;
        self.inner.refetch().await;
        Ok(created)
    }

    pub async fn update(&self, id: Uuid, payload: &CategoryUpdate) -> ResultClient<CategoryView> {
        let updated = self.inner.api.update_category(id, payload).await?;
        self.inner.refetch().await;
        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid) -> ResultClient<()> {
        self.inner.api.delete_category(id).await?;
        self.inner.refetch().await;
        Ok(())
    }
}
