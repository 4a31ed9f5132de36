//! Result inspector: the uploaded image next to its extracted fields.
//!
//! The dialog is rebuilt each time a record is opened, so rotation starts
//! at 0° for every record and is dropped on close.

use leptos::*;
use web_sys::{File, Url};

use crate::services::UploadSession;
use crate::types::{FieldRow, RecordId, Rotation};

#[component]
pub fn ResultInspector(
    session: RwSignal<UploadSession<File>>,
    selected: ReadSignal<Option<RecordId>>,
    set_selected: WriteSignal<Option<RecordId>>,
) -> impl IntoView {
    let on_close = Callback::new(move |_: ()| set_selected.set(None));

    move || {
        selected.get().map(|id| {
            view! { <InspectorDialog session=session id=id on_close=on_close/> }
        })
    }
}

#[component]
fn InspectorDialog(
    session: RwSignal<UploadSession<File>>,
    id: RecordId,
    on_close: Callback<()>,
) -> impl IntoView {
    // Ready records never change, so a snapshot is enough.
    let Some(record) = session.with_untracked(|s| s.find(id).cloned()) else {
        log::warn!("Inspector opened for unknown record {}", id);
        return view! {}.into_view();
    };

    let (rotation, set_rotation) = create_signal(Rotation::default());

    let image_url = match Url::create_object_url_with_blob(&record.raw_file) {
        Ok(url) => Some(url),
        Err(e) => {
            log::error!("Failed to create object URL for {}: {:?}", record.name, e);
            None
        }
    };
    if let Some(url) = image_url.clone() {
        on_cleanup(move || {
            let _ = Url::revoke_object_url(&url);
        });
    }

    let rows: Vec<FieldRow> = record
        .response
        .as_ref()
        .map(|fields| fields.display_rows())
        .unwrap_or_default();

    view! {
        <div class="modal-backdrop" on:click=move |_| on_close.call(())>
            <div class="modal" role="dialog" on:click=|ev| ev.stop_propagation()>
                <div class="modal-header">
                    <h3 class="modal-title">{record.name.clone()}</h3>
                    <button class="btn btn-ghost modal-close" title="Close" on:click=move |_| on_close.call(())>
                        "✕"
                    </button>
                </div>
                <div class="modal-body">
                    <div class="image-pane">
                        <div class="image-frame">
                            {image_url.map(|src| view! {
                                <img
                                    src=src
                                    alt=record.name.clone()
                                    class="document-image"
                                    style=move || rotation.get().css_transform()
                                />
                            })}
                        </div>
                        <button
                            class="btn btn-outline"
                            title="Rotate"
                            on:click=move |_| set_rotation.update(|r| *r = r.rotate())
                        >
                            "⟳"
                        </button>
                    </div>
                    <div class="fields-pane">
                        <table class="fields-table">
                            <tbody>
                                {rows
                                    .into_iter()
                                    .map(|row| view! {
                                        <tr>
                                            <td class="field-name">{row.label}</td>
                                            <td class="field-value">{row.value}</td>
                                        </tr>
                                    })
                                    .collect_view()}
                            </tbody>
                        </table>
                    </div>
                </div>
            </div>
        </div>
    }
    .into_view()
}
