use nalgebra::{Rotation3, Vector3};
use orientation_engine::{DisplayRotation, OrientationEngine, Reading, SensorKind};

const SAMPLE_PERIOD_MS: u64 = 20; // 50 Hz per sensor

fn main() {
    env_logger::init();

    let mut engine = OrientationEngine::new();

    // Earth field in the world frame (east, north, up), in µT
    let field = Vector3::new(0.0, 22.0, -40.0);
    let gravity = Vector3::new(0.0, 0.0, 9.81);

    for step in 0..250u64 {
        // this loop should run each time the host delivers sensor data
        let now = step * SAMPLE_PERIOD_MS;
        let heading = (now as f32 / 1000.0 * 18.0).to_radians(); // turning at 18°/s

        // A flat device turned clockwise by `heading` sees the world rotated the other way
        let world_to_device = Rotation3::from_axis_angle(&Vector3::z_axis(), heading);
        let accelerometer = world_to_device * gravity;
        let magnetometer = world_to_device * field;

        // Rotate the display a quarter turn halfway through
        let rotation = DisplayRotation::from_quarter_turns((step / 125) as u8);

        let samples = [
            (SensorKind::Accelerometer, accelerometer),
            (SensorKind::Magnetometer, magnetometer),
        ];
        for (sensor, value) in samples {
            match engine.on_sample(sensor, value.as_slice(), rotation, now) {
                Ok(outcome) => {
                    let Some(output) = outcome.output() else {
                        continue;
                    };
                    if let Reading::Views(views) = output.reading {
                        println!(
                            "{:>5} ms  rotation {:>3}°  heading {:6.1}°  pitch {:5.1}°  roll {:6.1}°  frame {:?}",
                            output.timestamp,
                            rotation.degrees(),
                            views.adaptive.angles.azimuth,
                            views.parallel_to_ground.pitch,
                            views.parallel_to_ground.roll,
                            views.adaptive.frame
                        );
                    }
                }
                Err(err) => eprintln!("{} sample rejected: {}", sensor, err),
            }
        }
    }

    let counters = engine.counters();
    println!(
        "accelerometer samples: {}, magnetometer samples: {}",
        counters.accelerometer, counters.magnetometer
    );
}
