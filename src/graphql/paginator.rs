use super::{Transport, TransportError, Variables};
use serde::Deserialize;
use serde_json::Value;

const CURSOR: &str = "cursor";
const PAGE_INFO: &str = "pageInfo";
const MERGED_LISTS: [&str; 2] = ["nodes", "edges"];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    has_next_page: bool,
    end_cursor: Option<String>,
}

/// Only the first field carrying a `pageInfo` drives the cursor. Nested
/// connections below it hold their first page only.
pub async fn paginate<T>(
    transport: &T,
    document: &str,
    variables: &Variables,
) -> Result<Value, TransportError>
where
    T: Transport + ?Sized,
{
    let mut cursor: Option<String> = None;
    let mut accumulated: Option<Value> = None;
    let mut page_number = 1;

    loop {
        let mut page_variables = variables.clone();
        page_variables.insert(
            CURSOR.to_owned(),
            cursor.clone().map(Value::String).unwrap_or(Value::Null),
        );

        let page = transport.execute(document, &page_variables).await?;

        let pointer = page_info_path(&page)
            .map(|path| to_pointer(&path))
            .ok_or(TransportError::MissingPageInfo)?;
        let page_info = read_page_info(&page, &pointer)?;

        log::debug!(
            "page {} at {}: hasNextPage={} endCursor={:?}",
            page_number,
            pointer,
            page_info.has_next_page,
            page_info.end_cursor
        );

        let merged = match accumulated.take() {
            Some(previous) => merge_page(previous, page, &pointer),
            None => page,
        };

        if !page_info.has_next_page {
            return Ok(merged);
        }

        match page_info.end_cursor {
            Some(next) if cursor.as_deref() != Some(next.as_str()) => cursor = Some(next),
            _ => return Err(TransportError::CursorNotAdvanced(cursor)),
        }

        accumulated = Some(merged);
        page_number += 1;
    }
}

fn page_info_path(value: &Value) -> Option<Vec<String>> {
    let object = value.as_object()?;

    for (key, child) in object {
        if key == PAGE_INFO {
            return Some(Vec::new());
        }

        if child.is_object() {
            if let Some(mut path) = page_info_path(child) {
                path.insert(0, key.to_owned());
                return Some(path);
            }
        }
    }

    None
}

fn to_pointer(path: &[String]) -> String {
    path.iter()
        .map(|key| format!("/{}", key.replace('~', "~0").replace('/', "~1")))
        .collect()
}

fn read_page_info(page: &Value, pointer: &str) -> Result<PageInfo, TransportError> {
    let page_info = page
        .pointer(pointer)
        .and_then(|field| field.get(PAGE_INFO))
        .ok_or(TransportError::MissingPageInfo)?;

    serde_json::from_value(page_info.clone())
        .map_err(|err| TransportError::Malformed(format!("invalid pageInfo: {}", err)))
}

fn merge_page(mut accumulated: Value, mut page: Value, pointer: &str) -> Value {
    if let (Some(Value::Object(target)), Some(Value::Object(source))) =
        (accumulated.pointer_mut(pointer), page.pointer_mut(pointer))
    {
        for key in MERGED_LISTS {
            if let Some(Value::Array(incoming)) = source.remove(key) {
                let slot = target
                    .entry(key)
                    .or_insert_with(|| Value::Array(Vec::new()));

                if let Value::Array(existing) = slot {
                    existing.extend(incoming);
                }
            }
        }

        if let Some(page_info) = source.remove(PAGE_INFO) {
            target.insert(PAGE_INFO.to_owned(), page_info);
        }
    }

    accumulated
}
