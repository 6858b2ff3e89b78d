//! Virtual input device backed by `/dev/uinput`.
//!
//! The device advertises an absolute pointer sized to the screen, the left
//! button, and the keys the controller's shortcuts use. Key presses and
//! releases are buffered until [`InputSink::sync`] so a whole chord reaches
//! the kernel in one report.

use std::os::unix::fs::MetadataExt;

use evdev::uinput::{VirtualDevice, VirtualDeviceBuilder};
use evdev::{AbsInfo, AbsoluteAxisType, AttributeSet, EventType, InputEvent, Key, UinputAbsSetup};

use handwave_common::error::{HandwaveError, HandwaveResult};
use handwave_gesture_core::sink::{InputSink, KeySym};
use handwave_platform_core::DisplayGeometry;

pub const UINPUT_PATH: &str = "/dev/uinput";
const DEVICE_NAME: &str = "handwave virtual pointer";

const PRESSED: i32 = 1;
const RELEASED: i32 = 0;

/// Kernel key code for a controller key.
pub fn key_code(key: KeySym) -> Key {
    match key {
        KeySym::SuperLeft => Key::KEY_LEFTMETA,
        KeySym::AltLeft => Key::KEY_LEFTALT,
        KeySym::ControlLeft => Key::KEY_LEFTCTRL,
        KeySym::ShiftLeft => Key::KEY_LEFTSHIFT,
        KeySym::Tab => Key::KEY_TAB,
        KeySym::Up => Key::KEY_UP,
        KeySym::Down => Key::KEY_DOWN,
        // Ctrl+= is the zoom-in shortcut on US layouts.
        KeySym::Plus => Key::KEY_EQUAL,
        KeySym::Minus => Key::KEY_MINUS,
    }
}

/// Injects pointer and keyboard events through a uinput device.
pub struct UinputSink {
    device: VirtualDevice,
    pending: Vec<InputEvent>,
    max_x: i32,
    max_y: i32,
    position: (f64, f64),
}

impl UinputSink {
    /// Create the virtual device for a screen of the given geometry.
    pub fn new(display: &dyn DisplayGeometry) -> HandwaveResult<Self> {
        let max_x = axis_max(display.screen_width());
        let max_y = axis_max(display.screen_height());

        let device = build_device(max_x, max_y).map_err(|e| {
            HandwaveError::device_unavailable(format!(
                "Failed to create uinput device: {e}; {}",
                uinput_diagnostic()
            ))
        })?;

        tracing::info!(
            device = DEVICE_NAME,
            width = max_x + 1,
            height = max_y + 1,
            "Created virtual input device"
        );

        Ok(Self {
            device,
            pending: Vec::new(),
            max_x,
            max_y,
            position: (0.0, 0.0),
        })
    }

    fn emit(&mut self, events: &[InputEvent]) -> HandwaveResult<()> {
        self.device
            .emit(events)
            .map_err(|e| HandwaveError::injection(format!("uinput write failed: {e}")))
    }
}

impl InputSink for UinputSink {
    fn move_pointer(&mut self, x: f64, y: f64) -> HandwaveResult<()> {
        let (ax, ay) = clamp_to_axes(x, y, self.max_x, self.max_y);
        self.emit(&[
            InputEvent::new(EventType::ABSOLUTE, AbsoluteAxisType::ABS_X.0, ax),
            InputEvent::new(EventType::ABSOLUTE, AbsoluteAxisType::ABS_Y.0, ay),
        ])?;
        self.position = (f64::from(ax), f64::from(ay));
        Ok(())
    }

    fn click_primary(&mut self) -> HandwaveResult<()> {
        // Separate reports; some compositors drop a press and release that
        // arrive in the same frame.
        self.emit(&[InputEvent::new(
            EventType::KEY,
            Key::BTN_LEFT.code(),
            PRESSED,
        )])?;
        self.emit(&[InputEvent::new(
            EventType::KEY,
            Key::BTN_LEFT.code(),
            RELEASED,
        )])
    }

    fn press_key(&mut self, key: KeySym) -> HandwaveResult<()> {
        self.pending
            .push(InputEvent::new(EventType::KEY, key_code(key).code(), PRESSED));
        Ok(())
    }

    fn release_key(&mut self, key: KeySym) -> HandwaveResult<()> {
        self.pending
            .push(InputEvent::new(EventType::KEY, key_code(key).code(), RELEASED));
        Ok(())
    }

    fn sync(&mut self) -> HandwaveResult<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let batch = std::mem::take(&mut self.pending);
        self.emit(&batch)
    }

    fn pointer_position(&self) -> Option<(f64, f64)> {
        Some(self.position)
    }

    fn name(&self) -> &str {
        "uinput"
    }
}

fn build_device(max_x: i32, max_y: i32) -> std::io::Result<VirtualDevice> {
    let mut keys = AttributeSet::<Key>::new();
    keys.insert(Key::BTN_LEFT);
    for key in KeySym::ALL {
        keys.insert(key_code(key));
    }

    let abs_x = UinputAbsSetup::new(AbsoluteAxisType::ABS_X, AbsInfo::new(0, 0, max_x, 0, 0, 0));
    let abs_y = UinputAbsSetup::new(AbsoluteAxisType::ABS_Y, AbsInfo::new(0, 0, max_y, 0, 0, 0));

    VirtualDeviceBuilder::new()?
        .name(DEVICE_NAME)
        .with_keys(&keys)?
        .with_absolute_axis(&abs_x)?
        .with_absolute_axis(&abs_y)?
        .build()
}

fn axis_max(extent: u32) -> i32 {
    i32::try_from(extent.max(1) - 1).unwrap_or(i32::MAX)
}

/// Round screen coordinates onto the device axes.
fn clamp_to_axes(x: f64, y: f64, max_x: i32, max_y: i32) -> (i32, i32) {
    let clamp = |v: f64, max: i32| {
        if v.is_nan() {
            0
        } else {
            v.round().clamp(0.0, f64::from(max)) as i32
        }
    };
    (clamp(x, max_x), clamp(y, max_y))
}

/// Describe why `/dev/uinput` may be unusable.
pub fn uinput_diagnostic() -> String {
    let uid = unsafe { libc::geteuid() };
    let gid = unsafe { libc::getegid() };

    match std::fs::metadata(UINPUT_PATH) {
        Ok(meta) => {
            let mode = meta.mode() & 0o777;
            let owner = meta.uid();
            let group = meta.gid();
            format!(
                "device={UINPUT_PATH} mode={mode:o} owner_uid={owner} owner_gid={group} process_uid={uid} process_gid={gid}; likely missing write access. Fix: add a udev rule granting the 'input' group access and run sudo usermod -aG input $USER"
            )
        }
        Err(err) => format!(
            "device={UINPUT_PATH} unavailable ({err}); load the module with sudo modprobe uinput"
        ),
    }
}
