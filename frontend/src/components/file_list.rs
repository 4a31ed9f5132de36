//! Table of uploads in this session.
//!
//! Ready rows open the inspector; errored rows can be removed or retried.

use leptos::*;
use web_sys::File;

use super::upload::start_upload;
use crate::services::UploadSession;
use crate::types::{RecordId, UploadRecord, UploadStatus};

#[component]
pub fn FileList(
    session: RwSignal<UploadSession<File>>,
    set_selected: WriteSignal<Option<RecordId>>,
) -> impl IntoView {
    let remove = move |id: RecordId| {
        session.update(|s| match s.position(id).map(|index| s.remove_record(index)) {
            Some(Ok(record)) => log::info!("🗑️ Removed {}", record.name),
            Some(Err(e)) => log::warn!("Cannot remove {}: {}", id, e),
            None => {}
        });
    };

    let retry = move |id: RecordId| {
        let taken = session
            .try_update(|s| s.position(id).map(|index| s.take_for_retry(index)))
            .flatten();
        match taken {
            Some(Ok(file)) => start_upload(session, vec![file]),
            Some(Err(e)) => log::warn!("Cannot retry {}: {}", id, e),
            None => {}
        }
    };

    view! {
        <div class="card">
            <div class="card-header">
                <h2 class="card-title">"Processing"</h2>
            </div>
            <div class="card-content">
                <Show
                    when=move || !session.with(|s| s.is_empty())
                    fallback=|| view! {
                        <div class="empty-state">
                            <p>"No Files Processing"</p>
                        </div>
                    }
                >
                    <table class="file-table">
                        <thead>
                            <tr>
                                <th>"File Name"</th>
                                <th>"Type"</th>
                                <th>"Size"</th>
                                <th>"Status"</th>
                                <th></th>
                            </tr>
                        </thead>
                        <tbody>
                            <For
                                each=move || session.with(|s| s.records().to_vec())
                                key=|record| (record.id, record.status)
                                children=move |record| view! {
                                    <FileRow
                                        record=record
                                        on_open=move |id: RecordId| set_selected.set(Some(id))
                                        on_remove=remove
                                        on_retry=retry
                                    />
                                }
                            />
                        </tbody>
                    </table>
                </Show>
            </div>
        </div>
    }
}

#[component]
fn FileRow(
    record: UploadRecord<File>,
    #[prop(into)] on_open: Callback<RecordId>,
    #[prop(into)] on_remove: Callback<RecordId>,
    #[prop(into)] on_retry: Callback<RecordId>,
) -> impl IntoView {
    let id = record.id;
    let status = record.status;

    let actions = match status {
        UploadStatus::Error => view! {
            <button
                class="btn btn-ghost"
                title="Retry"
                on:click=move |ev| {
                    ev.stop_propagation();
                    on_retry.call(id);
                }
            >
                "↻"
            </button>
            <button
                class="btn btn-ghost"
                title="Remove"
                on:click=move |ev| {
                    ev.stop_propagation();
                    on_remove.call(id);
                }
            >
                "✕"
            </button>
        }
        .into_view(),
        UploadStatus::Ready => view! { <span class="open-indicator" title="Open">"↗"</span> }.into_view(),
        UploadStatus::Processing => view! {}.into_view(),
    };

    view! {
        <tr
            class:clickable=record.is_ready()
            on:click=move |_| {
                if status == UploadStatus::Ready {
                    on_open.call(id);
                }
            }
        >
            <td>{record.name.clone()}</td>
            <td>{record.mime_type.clone()}</td>
            <td>{record.size_label()}</td>
            <td>
                <span class=status.css_class()>{status.label()}</span>
            </td>
            <td class="row-actions">{actions}</td>
        </tr>
    }
}
