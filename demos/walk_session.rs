//! Replay a short synthetic walk and print the resulting control frames

use synheart_pulse::config::EngineConfig;
use synheart_pulse::pipeline::replay_events;
use synheart_pulse::schema::SensorEvent;

fn main() {
    // Two steps per second, heart rate climbing through all three bands
    let mut events = Vec::new();
    for i in 0..16u64 {
        let t_ms = i * 250;
        let z = if i % 2 == 0 { 15.0 } else { 9.8 };
        events.push(SensorEvent::Motion {
            t_ms,
            x: Some(0.3),
            y: Some(0.1),
            z: Some(z),
        });
        if t_ms == 1000 {
            events.push(SensorEvent::HeartRate { t_ms, bpm: 88 });
        }
        if t_ms == 2000 {
            events.push(SensorEvent::HeartRateFrame {
                t_ms,
                bytes: vec![0x00, 112],
            });
        }
        if t_ms == 3000 {
            events.push(SensorEvent::HeartRate { t_ms, bpm: 150 });
        }
    }

    match replay_events(&events, EngineConfig::default(), 500, false) {
        Ok(frames) => {
            for frame in frames {
                match serde_json::to_string(&frame) {
                    Ok(line) => println!("{line}"),
                    Err(e) => eprintln!("Error: {e:?}"),
                }
            }
        }
        Err(e) => eprintln!("Error: {e:?}"),
    }
}
