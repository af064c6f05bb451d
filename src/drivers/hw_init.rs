//! One-shot GPIO bring-up.
//!
//! Configures the two reed-switch inputs (pull-up, active LOW), the two
//! relay outputs (open-drain, released) and the status LED (driven low),
//! then wraps them with the timer service in a [`GpioDoorHardware`].  Called once from `main()` before the
//! dispatch loop starts.

use esp_idf_hal::gpio::{AnyIOPin, AnyOutputPin, Input, InputOutput, Output, PinDriver, Pull};
use log::info;

use crate::adapters::hardware::GpioDoorHardware;
use crate::drivers::hw_timer::EspTimerService;
use crate::error::{Error, GpioError};
use crate::pins;

type SensorPin = PinDriver<'static, AnyIOPin, Input>;
type RelayPin = PinDriver<'static, AnyIOPin, InputOutput>;
type LedPin = PinDriver<'static, AnyOutputPin, Output>;

/// The production hardware adapter.
pub type EspDoorHardware =
    GpioDoorHardware<SensorPin, SensorPin, RelayPin, RelayPin, LedPin, EspTimerService>;

pub fn init_door_hardware(timers: EspTimerService) -> Result<EspDoorHardware, Error> {
    // SAFETY: each GPIO number is claimed exactly once, here, at boot.
    let (open_sensor, closed_sensor, open_relay, close_relay, led) = unsafe {
        (
            AnyIOPin::new(pins::OPEN_SENSOR_GPIO),
            AnyIOPin::new(pins::CLOSED_SENSOR_GPIO),
            AnyIOPin::new(pins::OPEN_RELAY_GPIO),
            AnyIOPin::new(pins::CLOSE_RELAY_GPIO),
            AnyOutputPin::new(pins::STATUS_LED_GPIO),
        )
    };

    let open_sensor = sensor_input(open_sensor)?;
    let closed_sensor = sensor_input(closed_sensor)?;
    let open_relay = relay_output(open_relay)?;
    let close_relay = relay_output(close_relay)?;
    let led = led_output(led)?;

    info!(
        "hw_init: sensors on GPIO{}/{}, relays on GPIO{}/{}, LED on GPIO{}",
        pins::OPEN_SENSOR_GPIO,
        pins::CLOSED_SENSOR_GPIO,
        pins::OPEN_RELAY_GPIO,
        pins::CLOSE_RELAY_GPIO,
        pins::STATUS_LED_GPIO
    );
    Ok(GpioDoorHardware::new(
        open_sensor,
        closed_sensor,
        open_relay,
        close_relay,
        led,
        timers,
    ))
}

fn sensor_input(pin: AnyIOPin) -> Result<SensorPin, Error> {
    let mut driver = PinDriver::input(pin).map_err(|_| Error::Init("sensor input"))?;
    driver
        .set_pull(Pull::Up)
        .map_err(|_| Error::Init("sensor pull-up"))?;
    Ok(driver)
}

fn relay_output(pin: AnyIOPin) -> Result<RelayPin, Error> {
    let mut driver = PinDriver::input_output_od(pin).map_err(|_| Error::Init("relay output"))?;
    // Release before anything else can drive it.
    driver
        .set_high()
        .map_err(|_| Error::Gpio(GpioError::WriteFailed))?;
    Ok(driver)
}

fn led_output(pin: AnyOutputPin) -> Result<LedPin, Error> {
    let mut driver = PinDriver::output(pin).map_err(|_| Error::Init("status LED"))?;
    driver
        .set_low()
        .map_err(|_| Error::Gpio(GpioError::WriteFailed))?;
    Ok(driver)
}
