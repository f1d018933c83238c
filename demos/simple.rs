use embedded_hal::delay::DelayNs;
use veml7700::{interface, ConfigBuilder, Gain, IntegrationTime, LuxSink, Veml7700};

struct PrintSink(&'static str);

impl LuxSink for PrintSink {
    fn publish(&mut self, lux: f32) {
        println!("{}: {:.1} lx", self.0, lux);
    }
}

fn main() {
    // placeholders, replace with instances from your HAL
    let i2c_bus = embedded_hal_mock::eh1::i2c::Mock::new(&[]);
    let mut delay = embedded_hal_mock::eh1::delay::NoopDelay::new();

    let config = ConfigBuilder::new()
        .gain(Gain::X1_8)
        .integration_time(IntegrationTime::Ms200);

    let mut sensor = Veml7700::new_with_i2c(&config, i2c_bus, interface::DEFAULT_ADDRESS)
        .with_ambient_light_sink(PrintSink("ambient light"))
        .with_white_sink(PrintSink("white"));

    sensor
        .setup(&mut delay)
        .unwrap_or_else(|_| panic!("sensor configuration failed"));
    sensor.dump_config();

    loop {
        if let Some(reading) = sensor.poll() {
            println!(
                "ALS counts = {}, lux = {:.1}",
                reading.als_counts, reading.als_lux
            );
        }

        // poll at roughly 1Hz
        delay.delay_ms(1000);
    }
}
