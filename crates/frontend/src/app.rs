use crate::domain::a001_store_order::ui::StoreOverviewList;
use leptos::prelude::*;
use thaw::ConfigProvider;

#[component]
pub fn App() -> impl IntoView {
    view! {
        <ConfigProvider>
            <StoreOverviewList />
        </ConfigProvider>
    }
}
