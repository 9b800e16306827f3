//! Platform SDK bridge for `nextbox_host_web` adapters.
//!
//! `interop` holds the target-specific transport; `payload` holds the pure conversions between
//! SDK payloads and contract types.

mod interop;
pub(crate) mod payload;

pub(crate) use interop::*;

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use nextbox_contract::{HttpRequest, ListParams, OrderDirection, StorageElementType};

    use super::*;

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn sdk_calls_fail_off_wasm() {
        let expected = "Nextbox SDK is only available when compiled for wasm32".to_string();

        assert_eq!(
            block_on(host_init()).expect_err("init").to_string(),
            expected
        );
        assert!(host_state().is_none());
        assert_eq!(
            block_on(storage_info("/a")).expect_err("info").to_string(),
            expected
        );
        assert_eq!(
            block_on(storage_create("a", "/", StorageElementType::File))
                .expect_err("create")
                .to_string(),
            expected
        );
        assert_eq!(
            block_on(storage_download("/a")).expect_err("download").to_string(),
            expected
        );
        assert_eq!(
            block_on(storage_replace("x", "/a")).expect_err("replace").to_string(),
            expected
        );
        let params = ListParams {
            path: "/".to_string(),
            with_meta: false,
            limit: 1,
            order_by: "name".to_string(),
            order_direction: OrderDirection::Asc,
            search: String::new(),
            file_name_ext: Vec::new(),
        };
        assert_eq!(
            block_on(storage_list(&params)).expect_err("list").to_string(),
            expected
        );
        assert_eq!(
            block_on(http_send(&HttpRequest::get("https://h/x")))
                .expect_err("send")
                .to_string(),
            expected
        );
        assert!(change_content(true).is_err());
    }
}
