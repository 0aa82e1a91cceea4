use crate::domain::a001_store_order::api::HttpOrderApi;
use crate::domain::a001_store_order::workflow::{
    FetchState, GlooSleeper, ListState, NoticeKind, Notification, Notifier, OrderListController,
};
use crate::shared::components::pagination_controls::PaginationControls;
use crate::shared::icons::icon;
use contracts::domain::a001_store_order::{legal_actions, StatusCategory, StoreOrder};
use contracts::shared::api::DEFAULT_PAGE_SIZE;
use leptos::prelude::*;
use leptos::reactive::owner::LocalStorage;
use leptos::task::spawn_local;
use std::rc::Rc;
use thaw::{
    Badge, BadgeAppearance, BadgeColor, Button, ButtonAppearance, ButtonSize, Input, MessageBar,
    MessageBarIntent, Table, TableBody, TableCell, TableCellLayout, TableHeader, TableHeaderCell,
    TableRow,
};

/// Уведомления workflow в message bar над таблицей
struct SignalNotifier {
    notice: RwSignal<Option<Notification>>,
}

impl Notifier for SignalNotifier {
    fn notify(&self, notification: Notification) {
        self.notice.set(Some(notification));
    }
}

fn badge_color(category: StatusCategory) -> BadgeColor {
    match category {
        StatusCategory::InProgress => BadgeColor::Informative,
        StatusCategory::Sent => BadgeColor::Brand,
        StatusCategory::Delivered => BadgeColor::Success,
        StatusCategory::Canceled => BadgeColor::Danger,
    }
}

/// Содержимое страницы под заголовком
#[derive(Debug, Clone, PartialEq, Eq)]
enum ListContent {
    Error(String),
    Loading,
    Empty,
    Table,
}

/// До первого ответа (Idle) страница выглядит так же, как при загрузке
fn list_content(fetch: FetchState, has_rows: bool) -> ListContent {
    match fetch {
        FetchState::Failed(message) => ListContent::Error(message),
        FetchState::Idle | FetchState::Loading if !has_rows => ListContent::Loading,
        FetchState::Loaded if !has_rows => ListContent::Empty,
        _ => ListContent::Table,
    }
}

fn format_date(order: &StoreOrder) -> String {
    order.created_at.format("%d.%m.%Y %H:%M").to_string()
}

#[component]
pub fn StoreOverviewList() -> impl IntoView {
    let notice = RwSignal::new(None::<Notification>);
    // счётчик ревизий хранилища: единственная связь Rc-мира с реактивностью
    let revision = RwSignal::new(0u64);
    let search_query = RwSignal::new(String::new());

    let controller = Rc::new(OrderListController::new(
        Rc::new(HttpOrderApi::new()),
        Rc::new(SignalNotifier { notice }),
        Rc::new(GlooSleeper),
        DEFAULT_PAGE_SIZE,
    ));
    controller.store().subscribe(move |rev| {
        revision.try_set(rev);
    });
    let controller = StoredValue::new_local(controller);

    let list_state = Memo::new(move |_| {
        revision.track();
        controller.with_value(|c| c.state())
    });
    let rows = move || {
        revision.track();
        controller.with_value(|c| c.store().snapshot())
    };

    let refresh = move || {
        let c = controller.get_value();
        spawn_local(async move { c.refresh().await });
    };

    let go_to_page = Callback::new(move |page: u32| {
        let c = controller.get_value();
        spawn_local(async move { c.go_to_page(page).await });
    });

    // Поиск: debounce внутри контроллера, сюда приходит каждое нажатие
    Effect::new(move |prev: Option<()>| {
        let text = search_query.get();
        if prev.is_none() {
            return;
        }
        let c = controller.get_value();
        spawn_local(async move { c.set_search(&text).await });
    });

    {
        let c = controller.get_value();
        spawn_local(async move { c.load().await });
    }

    on_cleanup(move || {
        controller.try_with_value(|c| c.close());
    });

    view! {
        <div class="page">
            <div class="page__header">
                <div class="page__header-left">
                    {icon("orders")}
                    <h1 class="page__title">"Bestellungen"</h1>
                </div>
                <div class="page__header-right">
                    <div style="width: 320px;">
                        <Input
                            value=search_query
                            placeholder="Suche nach Bestellung, Partner, E-Mail oder Größe..."
                        />
                    </div>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| refresh()
                        disabled=Signal::derive(move || list_state.get().is_loading())
                    >
                        {icon("refresh")}
                        " Aktualisieren"
                    </Button>
                </div>
            </div>

            {move || notice.get().map(|n| {
                let intent = match n.kind {
                    NoticeKind::Success => MessageBarIntent::Success,
                    NoticeKind::Error => MessageBarIntent::Error,
                };
                view! {
                    <div style="margin-bottom: var(--spacing-md);" on:click=move |_| notice.set(None)>
                        <MessageBar intent=intent>{n.message}</MessageBar>
                    </div>
                }
            })}

            <div class="page__content">
                {move || {
                    let state: ListState = list_state.get();
                    match list_content(state.fetch, !rows().is_empty()) {
                        ListContent::Error(message) => view! {
                            <MessageBar intent=MessageBarIntent::Error>
                                {message}
                            </MessageBar>
                        }.into_any(),
                        ListContent::Loading => view! {
                            <div style="padding: 48px; text-align: center;">
                                <p>"Laden..."</p>
                            </div>
                        }.into_any(),
                        ListContent::Empty => view! {
                            <div style="padding: 48px; text-align: center;">
                                <p style="color: var(--thaw-color-neutral-foreground-2);">
                                    "Keine Bestellungen gefunden"
                                </p>
                            </div>
                        }.into_any(),
                        ListContent::Table => view! { <OrdersTable rows=Signal::derive(rows) controller=controller /> }.into_any(),
                    }
                }}

                <PaginationControls
                    current_page=Signal::derive(move || list_state.get().page)
                    total_pages=Signal::derive(move || list_state.get().total_pages)
                    total_count=Signal::derive(move || list_state.get().total_items)
                    on_page_change=go_to_page
                />
            </div>
        </div>
    }
}

#[component]
fn OrdersTable(
    rows: Signal<Vec<StoreOrder>>,
    controller: StoredValue<Rc<OrderListController>, LocalStorage>,
) -> impl IntoView {
    view! {
        <Table>
            <TableHeader>
                <TableRow>
                    <TableHeaderCell min_width=160.0>"Bestellung"</TableHeaderCell>
                    <TableHeaderCell min_width=200.0>"Partner"</TableHeaderCell>
                    <TableHeaderCell min_width=80.0>"Größe"</TableHeaderCell>
                    <TableHeaderCell min_width=80.0>"Länge"</TableHeaderCell>
                    <TableHeaderCell min_width=60.0>"Menge"</TableHeaderCell>
                    <TableHeaderCell min_width=140.0>"Erstellt"</TableHeaderCell>
                    <TableHeaderCell min_width=140.0>"Status"</TableHeaderCell>
                    <TableHeaderCell min_width=260.0>"Aktionen"</TableHeaderCell>
                </TableRow>
            </TableHeader>
            <TableBody>
                {move || rows.get().into_iter().map(|order| {
                    let display = order.status_display();
                    let actions = legal_actions(display.category);
                    let created = format_date(&order);
                    let partner = order.partner_name().to_string();
                    let order_id = order.id.clone();

                    view! {
                        <TableRow>
                            <TableCell><TableCellLayout>{order.id.clone()}</TableCellLayout></TableCell>
                            <TableCell><TableCellLayout>{partner}</TableCellLayout></TableCell>
                            <TableCell><TableCellLayout>{order.size.clone().unwrap_or_else(|| "-".to_string())}</TableCellLayout></TableCell>
                            <TableCell><TableCellLayout>{order.length.clone().unwrap_or_else(|| "-".to_string())}</TableCellLayout></TableCell>
                            <TableCell><TableCellLayout>{order.quantity}</TableCellLayout></TableCell>
                            <TableCell><TableCellLayout>{created}</TableCellLayout></TableCell>
                            <TableCell>
                                <TableCellLayout>
                                    <Badge appearance=BadgeAppearance::Tint color=badge_color(display.category)>
                                        {display.label.clone()}
                                    </Badge>
                                </TableCellLayout>
                            </TableCell>
                            <TableCell>
                                <TableCellLayout>
                                    {if actions.is_empty() {
                                        view! {
                                            <span style="color: var(--thaw-color-neutral-foreground-3);">
                                                {icon("check")}
                                                " Abgeschlossen"
                                            </span>
                                        }.into_any()
                                    } else {
                                        actions.iter().map(|action| {
                                            let target = action.target;
                                            let id_for_disabled = order_id.clone();
                                            let id_for_click = order_id.clone();
                                            let appearance = if action.destructive {
                                                ButtonAppearance::Secondary
                                            } else {
                                                ButtonAppearance::Primary
                                            };
                                            let style = if action.destructive {
                                                "color: var(--thaw-color-palette-red-foreground-1); margin-right: 4px;"
                                            } else {
                                                "margin-right: 4px;"
                                            };
                                            view! {
                                                <Button
                                                    size=ButtonSize::Small
                                                    appearance=appearance
                                                    attr:style=style
                                                    disabled=Signal::derive(move || {
                                                        rows.track();
                                                        controller.with_value(|c| {
                                                            c.coordinator().is_in_flight(&id_for_disabled, target)
                                                        })
                                                    })
                                                    on_click=move |_| {
                                                        let coordinator = controller.with_value(|c| c.coordinator());
                                                        let id = id_for_click.clone();
                                                        spawn_local(async move {
                                                            coordinator.request_transition(&id, target).await;
                                                        });
                                                    }
                                                >
                                                    {action.label}
                                                </Button>
                                            }
                                        }).collect_view().into_any()
                                    }}
                                </TableCellLayout>
                            </TableCell>
                        </TableRow>
                    }
                }).collect_view()}
            </TableBody>
        </Table>
    }
}
