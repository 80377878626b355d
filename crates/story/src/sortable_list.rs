use gpui::prelude::FluentBuilder as _;
use gpui::*;
use gpui_component::ActiveTheme as _;
use gpui_component::list::ListItem;
use gpui_component::{Icon, IconName, Sizable as _, h_flex, v_flex};
use gpui_sortable_vlist::{
    SortableRowState, SortableVListItem, SortableVListState, sortable_vlist,
};

const ITEM_COUNT: usize = 20;

pub struct SortableListExample {
    list: Entity<SortableVListState<()>>,
}

impl SortableListExample {
    pub fn view(_window: &mut Window, cx: &mut App) -> Entity<Self> {
        cx.new(|cx| {
            let list = cx.new(|cx| {
                SortableVListState::new(cx)
                    .items(demo_items())
                    .drag_on_row()
                    .on_reorder(|reorder, _items| {
                        log::info!("moved {} from {} to {}", reorder.item_id, reorder.from, reorder.to);
                    })
            });
            cx.observe(&list, |_, _, cx| cx.notify()).detach();
            Self { list }
        })
    }
}

impl Render for SortableListExample {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();
        let list = self.list.read(cx);
        let dragged = list
            .dragged_index()
            .and_then(|ix| list.items_ref().get(ix))
            .map(|item| item.label.to_string())
            .unwrap_or_else(|| "<none>".to_string());
        let dump = list
            .items_ref()
            .iter()
            .enumerate()
            .map(|(ix, item)| {
                let h = f32::from(item.item_height());
                format!("{ix:02}  {}  h={h:.0}px", item.label)
            })
            .collect::<Vec<_>>()
            .join("\n");

        v_flex()
            .size_full()
            .p(px(16.))
            .gap_y_3()
            .child(
                v_flex()
                    .gap_y_1()
                    .child(
                        div()
                            .text_xl()
                            .font_weight(FontWeight::BOLD)
                            .child("Sortable VList"),
                    )
                    .child(
                        div()
                            .text_sm()
                            .text_color(theme.muted_foreground)
                            .child("Drag a row past its neighbors to reorder; hold it past the edge to autoscroll."),
                    )
                    .child(
                        div()
                            .text_sm()
                            .text_color(theme.muted_foreground)
                            .child(format!("Dragging: {dragged}")),
                    ),
            )
            .child(
                h_flex()
                    .flex_1()
                    .min_h(px(0.))
                    .gap_x_3()
                    .child(
                        div()
                            .w(px(420.))
                            .h_full()
                            .rounded(px(12.))
                            .border_1()
                            .border_color(theme.border)
                            .bg(theme.background)
                            .child(sortable_vlist(
                                &self.list,
                                move |ix, item, row_state, _window, cx| {
                                    render_row(ix, item, row_state, cx)
                                },
                            )),
                    )
                    .child(
                        div()
                            .flex_1()
                            .min_w(px(0.))
                            .h_full()
                            .rounded(px(12.))
                            .border_1()
                            .border_color(theme.border)
                            .bg(theme.background)
                            .p(px(12.))
                            .child(render_dump(dump)),
                    ),
            )
    }
}

fn render_row(
    ix: usize,
    item: &SortableVListItem<()>,
    row_state: SortableRowState,
    cx: &mut App,
) -> ListItem {
    let theme = cx.theme();

    ListItem::new(ix)
        .when(row_state.dragging, |this| this.opacity(0.9))
        .child(
            h_flex()
                .w_full()
                .gap_x_2()
                .items_center()
                .child(
                    Icon::from(IconName::Menu)
                        .small()
                        .text_color(theme.muted_foreground),
                )
                .child(item.label.clone()),
        )
}

fn render_dump(text: String) -> impl IntoElement {
    let lines = text
        .lines()
        .map(|line| div().text_sm().child(line.to_string()));
    v_flex().gap_y_0p5().children(lines)
}

fn demo_items() -> Vec<SortableVListItem<()>> {
    let heights = [px(48.), px(48.), px(72.), px(36.)];

    (0..ITEM_COUNT)
        .map(|ix| {
            SortableVListItem::new(format!("item/{ix:02}"), format!("Item {ix}"), ())
                .height(heights[ix % heights.len()])
        })
        .collect()
}
