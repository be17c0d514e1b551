#![allow(dead_code)]

use calbridge_common::testing::TempDir;
use calbridge_domain::constants::{READ_CALENDAR_PERMISSION, WRITE_CALENDAR_PERMISSION};
use calbridge_domain::{AccessLevel, BridgeConfig, PermissionConfig, StoreConfig};
use calbridge_api::{CalendarPlugin, ChannelReply, HostBinding, MethodCall};

/// Plugin over a fresh on-disk store, with the host side of the gate.
pub struct TestPlugin {
    pub plugin: CalendarPlugin,
    pub host: HostBinding,
    _temp_dir: TempDir,
}

impl TestPlugin {
    /// Plugin with no permissions granted and no prompt expiry.
    pub async fn new() -> Self {
        Self::with_permissions(PermissionConfig::default()).await
    }

    pub async fn with_permissions(permissions: PermissionConfig) -> Self {
        let temp_dir = TempDir::new("api-test").expect("temp dir should be created");
        let config = BridgeConfig {
            store: StoreConfig {
                path: temp_dir.path().join("calendar.db").to_string_lossy().into_owned(),
                pool_size: 2,
            },
            permissions,
            time_zone: Some("UTC".to_string()),
        };

        let (plugin, host) =
            CalendarPlugin::with_host_gate(config).await.expect("plugin should start");
        Self { plugin, host, _temp_dir: temp_dir }
    }

    /// Same as `new`, with both calendar permissions already held.
    pub async fn granted() -> Self {
        let test = Self::new().await;
        test.grant_all();
        test
    }

    pub fn grant_all(&self) {
        self.host.gate.set_granted(READ_CALENDAR_PERMISSION, true);
        self.host.gate.set_granted(WRITE_CALENDAR_PERMISSION, true);
    }

    /// Seed a calendar and return its id as the caller would pass it.
    pub fn calendar(&self, name: &str, access: AccessLevel) -> String {
        self.plugin
            .store()
            .insert_calendar(name, access, "tester@example.com")
            .expect("calendar should be inserted")
            .to_string()
    }

    /// Run a call that must complete without a prompt.
    pub async fn call(&self, call: MethodCall) -> ChannelReply {
        let mut pending = self.plugin.handle(call).await;
        assert!(!pending.is_deferred(), "call was parked behind a prompt");
        pending.try_reply().expect("reply should already be delivered")
    }
}

/// Decode a reply carrying JSON text.
pub fn json_text<T: serde::de::DeserializeOwned>(reply: &ChannelReply) -> T {
    let text = reply
        .result()
        .and_then(serde_json::Value::as_str)
        .expect("reply should carry JSON text");
    serde_json::from_str(text).expect("reply text should be valid JSON")
}
