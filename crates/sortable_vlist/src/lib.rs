mod list;

pub use list::{
    SortableReorder, SortableRowState, SortableVList, SortableVListItem, SortableVListState,
    sortable_vlist,
};
