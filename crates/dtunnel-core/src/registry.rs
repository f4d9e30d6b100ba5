// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Event registry: the host binding surface.
//
// These names are the wire protocol between the page and the native host:
// capability objects the host injects, callbacks the host invokes, and the
// semantic events each callback produces. They must match the host exactly.

use serde::{Deserialize, Serialize};

/// Every capability object name a DTunnel host is known to inject.
pub const BRIDGE_OBJECT_NAMES: [&str; 48] = [
    "DtSetConfig",
    "DtGetConfigs",
    "DtGetDefaultConfig",
    "DtExecuteDialogConfig",
    "DtUsername",
    "DtPassword",
    "DtGetLocalConfigVersion",
    "DtCDNCount",
    "DtUuid",
    "DtGetLogs",
    "DtClearLogs",
    "DtExecuteVpnStart",
    "DtExecuteVpnStop",
    "DtGetVpnState",
    "DtStartAppUpdate",
    "DtStartCheckUser",
    "DtShowLoggerDialog",
    "DtGetLocalIP",
    "DtAirplaneActivate",
    "DtAirplaneDeactivate",
    "DtAirplaneState",
    "DtAppIsCurrentAssistant",
    "DtShowMenuDialog",
    "DtGetNetworkName",
    "DtGetPingResult",
    "DtTranslateText",
    "DtCleanApp",
    "DtGoToVoiceInputSettings",
    "DtGetAppConfig",
    "DtIgnoreBatteryOptimizations",
    "DtStartApnActivity",
    "DtStartNetworkActivity",
    "DtStartWebViewActivity",
    "DtStartRadioInfoActivity",
    "DtGetDeviceID",
    "DtSendNotification",
    "DtGetNetworkData",
    "DtGetStatusBarHeight",
    "DtGetNavigationBarHeight",
    "DtOpenExternalUrl",
    "DtStartHotSpotService",
    "DtStopHotSpotService",
    "DtGetStatusHotSpotService",
    "DtGetNetworkDownloadBytes",
    "DtGetNetworkUploadBytes",
    "DtAppVersion",
    "DtActionHandler",
    "DtCloseApp",
];

/// Capability objects shaped as `get()` / `set(value)` properties rather
/// than `execute(...)` actions.
pub const PROPERTY_OBJECT_NAMES: [&str; 3] = ["DtUsername", "DtPassword", "DtUuid"];

/// Whether `name` is one of the known capability object names.
pub fn is_bridge_object(name: &str) -> bool {
    BRIDGE_OBJECT_NAMES.contains(&name)
}

/// How a semantic event's payload is derived from the raw callback payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayloadPolicy {
    /// Deliver the raw payload untouched.
    Raw,
    /// Best-effort JSON decode of the raw payload.
    Json,
}

/// A global function name the host calls to push an event into the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NativeCallback {
    #[serde(rename = "DtVpnStateEvent")]
    VpnState,
    #[serde(rename = "DtVpnStartedSuccessEvent")]
    VpnStartedSuccess,
    #[serde(rename = "DtVpnStoppedSuccessEvent")]
    VpnStoppedSuccess,
    #[serde(rename = "DtNewLogEvent")]
    NewLog,
    #[serde(rename = "DtNewDefaultConfigEvent")]
    NewDefaultConfig,
    #[serde(rename = "DtCheckUserStartedEvent")]
    CheckUserStarted,
    #[serde(rename = "DtCheckUserResultEvent")]
    CheckUserResult,
    #[serde(rename = "DtCheckUserErrorEvent")]
    CheckUserError,
    #[serde(rename = "DtMessageErrorEvent")]
    MessageError,
    #[serde(rename = "DtSuccessToastEvent")]
    SuccessToast,
    #[serde(rename = "DtErrorToastEvent")]
    ErrorToast,
    #[serde(rename = "DtNotificationEvent")]
    Notification,
}

impl NativeCallback {
    /// All known callbacks, in installation order.
    pub const ALL: [NativeCallback; 12] = [
        Self::VpnState,
        Self::VpnStartedSuccess,
        Self::VpnStoppedSuccess,
        Self::NewLog,
        Self::NewDefaultConfig,
        Self::CheckUserStarted,
        Self::CheckUserResult,
        Self::CheckUserError,
        Self::MessageError,
        Self::SuccessToast,
        Self::ErrorToast,
        Self::Notification,
    ];

    /// The exact global function name on the host.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VpnState => "DtVpnStateEvent",
            Self::VpnStartedSuccess => "DtVpnStartedSuccessEvent",
            Self::VpnStoppedSuccess => "DtVpnStoppedSuccessEvent",
            Self::NewLog => "DtNewLogEvent",
            Self::NewDefaultConfig => "DtNewDefaultConfigEvent",
            Self::CheckUserStarted => "DtCheckUserStartedEvent",
            Self::CheckUserResult => "DtCheckUserResultEvent",
            Self::CheckUserError => "DtCheckUserErrorEvent",
            Self::MessageError => "DtMessageErrorEvent",
            Self::SuccessToast => "DtSuccessToastEvent",
            Self::ErrorToast => "DtErrorToastEvent",
            Self::Notification => "DtNotificationEvent",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|cb| cb.as_str() == name)
    }

    /// The semantic event this callback produces.
    pub fn semantic(&self) -> SemanticEvent {
        match self {
            Self::VpnState => SemanticEvent::VpnState,
            Self::VpnStartedSuccess => SemanticEvent::VpnStartedSuccess,
            Self::VpnStoppedSuccess => SemanticEvent::VpnStoppedSuccess,
            Self::NewLog => SemanticEvent::NewLog,
            Self::NewDefaultConfig => SemanticEvent::NewDefaultConfig,
            Self::CheckUserStarted => SemanticEvent::CheckUserStarted,
            Self::CheckUserResult => SemanticEvent::CheckUserResult,
            Self::CheckUserError => SemanticEvent::CheckUserError,
            Self::MessageError => SemanticEvent::MessageError,
            Self::SuccessToast => SemanticEvent::ShowSuccessToast,
            Self::ErrorToast => SemanticEvent::ShowErrorToast,
            Self::Notification => SemanticEvent::Notification,
        }
    }
}

impl std::fmt::Display for NativeCallback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stable, business-meaningful event name delivered to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SemanticEvent {
    VpnState,
    VpnStartedSuccess,
    VpnStoppedSuccess,
    NewLog,
    NewDefaultConfig,
    CheckUserStarted,
    CheckUserResult,
    CheckUserError,
    MessageError,
    ShowSuccessToast,
    ShowErrorToast,
    Notification,
}

impl SemanticEvent {
    pub const ALL: [SemanticEvent; 12] = [
        Self::VpnState,
        Self::VpnStartedSuccess,
        Self::VpnStoppedSuccess,
        Self::NewLog,
        Self::NewDefaultConfig,
        Self::CheckUserStarted,
        Self::CheckUserResult,
        Self::CheckUserError,
        Self::MessageError,
        Self::ShowSuccessToast,
        Self::ShowErrorToast,
        Self::Notification,
    ];

    /// Channel name subscribers use for this event.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VpnState => "vpnState",
            Self::VpnStartedSuccess => "vpnStartedSuccess",
            Self::VpnStoppedSuccess => "vpnStoppedSuccess",
            Self::NewLog => "newLog",
            Self::NewDefaultConfig => "newDefaultConfig",
            Self::CheckUserStarted => "checkUserStarted",
            Self::CheckUserResult => "checkUserResult",
            Self::CheckUserError => "checkUserError",
            Self::MessageError => "messageError",
            Self::ShowSuccessToast => "showSuccessToast",
            Self::ShowErrorToast => "showErrorToast",
            Self::Notification => "notification",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ev| ev.as_str() == name)
    }

    pub fn definition(&self) -> &'static EventDefinition {
        // EVENT_DEFINITIONS is declared in the same order as ALL.
        &EVENT_DEFINITIONS[*self as usize]
    }

    /// The callback the host invokes to raise this event.
    pub fn callback(&self) -> NativeCallback {
        self.definition().callbacks[0]
    }

    pub fn payload_policy(&self) -> PayloadPolicy {
        self.definition().policy
    }
}

impl std::fmt::Display for SemanticEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registry entry: which callbacks produce an event and how to decode it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventDefinition {
    pub name: SemanticEvent,
    pub callbacks: &'static [NativeCallback],
    pub policy: PayloadPolicy,
}

pub static EVENT_DEFINITIONS: [EventDefinition; 12] = [
    EventDefinition {
        name: SemanticEvent::VpnState,
        callbacks: &[NativeCallback::VpnState],
        policy: PayloadPolicy::Raw,
    },
    EventDefinition {
        name: SemanticEvent::VpnStartedSuccess,
        callbacks: &[NativeCallback::VpnStartedSuccess],
        policy: PayloadPolicy::Raw,
    },
    EventDefinition {
        name: SemanticEvent::VpnStoppedSuccess,
        callbacks: &[NativeCallback::VpnStoppedSuccess],
        policy: PayloadPolicy::Raw,
    },
    EventDefinition {
        name: SemanticEvent::NewLog,
        callbacks: &[NativeCallback::NewLog],
        policy: PayloadPolicy::Raw,
    },
    EventDefinition {
        name: SemanticEvent::NewDefaultConfig,
        callbacks: &[NativeCallback::NewDefaultConfig],
        policy: PayloadPolicy::Raw,
    },
    EventDefinition {
        name: SemanticEvent::CheckUserStarted,
        callbacks: &[NativeCallback::CheckUserStarted],
        policy: PayloadPolicy::Raw,
    },
    EventDefinition {
        name: SemanticEvent::CheckUserResult,
        callbacks: &[NativeCallback::CheckUserResult],
        policy: PayloadPolicy::Json,
    },
    EventDefinition {
        name: SemanticEvent::CheckUserError,
        callbacks: &[NativeCallback::CheckUserError],
        policy: PayloadPolicy::Raw,
    },
    EventDefinition {
        name: SemanticEvent::MessageError,
        callbacks: &[NativeCallback::MessageError],
        policy: PayloadPolicy::Json,
    },
    EventDefinition {
        name: SemanticEvent::ShowSuccessToast,
        callbacks: &[NativeCallback::SuccessToast],
        policy: PayloadPolicy::Raw,
    },
    EventDefinition {
        name: SemanticEvent::ShowErrorToast,
        callbacks: &[NativeCallback::ErrorToast],
        policy: PayloadPolicy::Raw,
    },
    EventDefinition {
        name: SemanticEvent::Notification,
        callbacks: &[NativeCallback::Notification],
        policy: PayloadPolicy::Json,
    },
];

/// Map a raw callback name to the semantic event it produces, if known.
pub fn semantic_for_callback(callback_name: &str) -> Option<SemanticEvent> {
    EVENT_DEFINITIONS
        .iter()
        .find(|def| def.callbacks.iter().any(|cb| cb.as_str() == callback_name))
        .map(|def| def.name)
}
