#![no_main]
#![no_std]

#[macro_use]
mod macros;
mod keymap;
mod vial;

use defmt::{info, warn};
use embassy_executor::Spawner;
use embassy_stm32::flash::Flash;
use embassy_stm32::gpio::{Input, Level, Output, Pull, Speed};
use embassy_stm32::peripherals::USB;
use embassy_stm32::rcc::{self, Hse, HseMode, Pll, PllMul, PllPreDiv, PllSource, Sysclk, UsbPre};
use embassy_stm32::time::Hertz;
use embassy_stm32::usb::{Driver, InterruptHandler};
use embassy_stm32::{Config, bind_interrupts};
use embassy_time::Timer;
use keymap::{COL, ROW};
use planck_keymap::config::KeyboardConfig;
use rmk::channel::EVENT_CHANNEL;
use rmk::config::{BehaviorConfig, KeyboardUsbConfig, PositionalConfig, RmkConfig, StorageConfig, VialConfig};
use rmk::debounce::default_debouncer::DefaultDebouncer;
use rmk::futures::future::join4;
use rmk::input_device::Runnable;
use rmk::input_device::rotary_encoder::{RotaryEncoder, RotaryEncoderProcessor};
use rmk::keyboard::Keyboard;
use rmk::keyboard_macros::define_macro_sequences;
use rmk::matrix::Matrix;
use rmk::storage::async_flash_wrapper;
use rmk::{initialize_encoder_keymap_and_storage, run_devices, run_processor_chain, run_rmk};
use vial::VIAL_KEYBOARD_DEF;
use {defmt_rtt as _, panic_probe as _};

bind_interrupts!(struct Irqs {
    USB_LP_CAN_RX0 => InterruptHandler<USB>;
});

/// Pulses per detent of the Planck rev6 encoder
const ENCODER_RESOLUTION: u8 = 4;

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("RMK start!");
    // RCC config, 8MHz crystal to 72MHz sysclk, USB at 48MHz
    let mut config = Config::default();
    config.rcc.hse = Some(Hse {
        freq: Hertz(8_000_000),
        mode: HseMode::Oscillator,
    });
    config.rcc.pll = Some(Pll {
        src: PllSource::HSE,
        prediv: PllPreDiv::DIV1,
        mul: PllMul::MUL9,
    });
    config.rcc.sys = Sysclk::PLL1_P;
    config.rcc.ahb_pre = rcc::AHBPrescaler::DIV1;
    config.rcc.apb1_pre = rcc::APBPrescaler::DIV2;
    config.rcc.apb2_pre = rcc::APBPrescaler::DIV1;
    config.rcc.usb_pre = UsbPre::DIV1_5;

    // Initialize peripherals
    let mut p = embassy_stm32::init(config);

    // Pull D+ low so the host notices a reset and enumerates again
    {
        let _dp = Output::new(p.PA12.reborrow(), Level::Low, Speed::Low);
        Timer::after_millis(10).await;
    }

    // Usb driver
    let driver = Driver::new(p.USB, Irqs, p.PA12, p.PA11);

    // Pin config, rows are read and columns driven (col2row)
    let (row_pins, col_pins) = config_matrix_pins_stm32!(
        peripherals: p,
        input: [PA10, PA9, PA8, PB15, PC13, PC14, PC15, PA2],
        output: [PB11, PB10, PB2, PB1, PA7, PB0]
    );

    // Use internal flash to emulate eeprom
    let flash = async_flash_wrapper(Flash::new_blocking(p.FLASH));

    // Keyboard config
    let planck_config = KeyboardConfig::default();
    let usb = planck_config.usb_config;
    let vial = planck_config.vial_config;
    let rmk_config = RmkConfig {
        usb_config: KeyboardUsbConfig {
            vid: usb.vid,
            pid: usb.pid,
            manufacturer: usb.manufacturer,
            product_name: usb.product_name,
            serial_number: usb.serial_number,
        },
        vial_config: VialConfig::new(vial.vial_keyboard_id, VIAL_KEYBOARD_DEF, vial.unlock_keys),
        ..Default::default()
    };
    if planck_config.audio_config.clicky {
        warn!("Audio is not wired on this board, clicky and music keys do nothing");
    }

    // Behavior: tri layer, tap dances as morse keys and their triple tap macros
    let mut behavior_config = BehaviorConfig::default();
    behavior_config.tri_layer = planck_config.behavior_config.tri_layer;
    let burst_macros = keymap::burst_macros();
    behavior_config.keyboard_macros.macro_sequences = define_macro_sequences(burst_macros.as_slice());
    behavior_config.morse.default_profile = keymap::PROFILE;
    for morse in keymap::tap_dance_morses() {
        if behavior_config.morse.morses.push(morse).is_err() {
            warn!("Too many tap dances, the rest are dropped");
            break;
        }
    }

    // Initialize the storage and keymap
    let mut default_keymap = keymap::get_default_keymap();
    let mut encoder_map = keymap::get_default_encoder_map();
    let storage_config = StorageConfig::default();
    let mut per_key_config = PositionalConfig::default();
    let (keymap, mut storage) = initialize_encoder_keymap_and_storage(
        &mut default_keymap,
        &mut encoder_map,
        flash,
        &storage_config,
        &mut behavior_config,
        &mut per_key_config,
    )
    .await;

    // Initialize the matrix, encoder and keyboard
    let debouncer = DefaultDebouncer::new();
    let mut matrix = Matrix::<_, _, _, ROW, COL, true>::new(row_pins, col_pins, debouncer);
    let pin_a = Input::new(p.PB12, Pull::Up);
    let pin_b = Input::new(p.PB13, Pull::Up);
    let mut encoder = RotaryEncoder::with_resolution(pin_a, pin_b, ENCODER_RESOLUTION, false, 0);
    let mut encoder_processor = RotaryEncoderProcessor::new(&keymap);
    let mut keyboard = Keyboard::new(&keymap);

    // Start
    join4(
        run_devices! (
            (matrix, encoder) => EVENT_CHANNEL,
        ),
        run_processor_chain! (
            EVENT_CHANNEL => [encoder_processor],
        ),
        keyboard.run(),
        run_rmk(&keymap, driver, &mut storage, rmk_config),
    )
    .await;
}
