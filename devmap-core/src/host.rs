use std::sync::Mutex;

/// Outbound notifications to the embedding dashboard.
///
/// These are the only side effects the panel has; everything else is a
/// return value.
pub trait PanelHost: Send + Sync {
    fn device_selected(&self, deviceid: &str);
    fn fit_view(&self, fit: bool);
    fn expand_detail(&self, deviceid: &str);
}

/// Host that ignores every notification.
pub struct NullHost;

impl PanelHost for NullHost {
    fn device_selected(&self, _deviceid: &str) {}
    fn fit_view(&self, _fit: bool) {}
    fn expand_detail(&self, _deviceid: &str) {}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostEvent {
    DeviceSelected(String),
    FitView(bool),
    ExpandDetail(String),
}

/// Host that keeps every notification in call order.
#[derive(Default)]
pub struct RecordingHost {
    events: Mutex<Vec<HostEvent>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<HostEvent> {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn take(&self) -> Vec<HostEvent> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(|e| e.into_inner()))
    }

    fn push(&self, event: HostEvent) {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).push(event);
    }
}

impl PanelHost for RecordingHost {
    fn device_selected(&self, deviceid: &str) {
        self.push(HostEvent::DeviceSelected(deviceid.to_string()));
    }

    fn fit_view(&self, fit: bool) {
        self.push(HostEvent::FitView(fit));
    }

    fn expand_detail(&self, deviceid: &str) {
        self.push(HostEvent::ExpandDetail(deviceid.to_string()));
    }
}
