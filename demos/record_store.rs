//! Record store example: restaurants sorted by distance, looked up by field
//! and persisted to a dump file

use bytes::{Buf, BufMut, Bytes, BytesMut};
use chainlist_core::{Direction, List, ListError, RawElement};

#[derive(Debug, Clone, PartialEq)]
struct Restaurant {
    id: u32,
    latitude: f32,
    longitude: f32,
    name: String,
    food_type: String,
}

impl RawElement for Restaurant {}

/// What to look for
enum Lookup {
    Id(u32),
    FoodType(&'static str),
}

const HOME: (f32, f32) = (38.7223, -9.1393);

fn distance_sq(r: &Restaurant) -> f32 {
    let dlat = r.latitude - HOME.0;
    let dlon = r.longitude - HOME.1;
    dlat * dlat + dlon * dlon
}

fn put_str(buf: &mut BytesMut, s: &str) {
    buf.put_u16(s.len() as u16);
    buf.put_slice(s.as_bytes());
}

fn get_str(buf: &mut &[u8]) -> Result<String, ListError> {
    if buf.remaining() < 2 {
        return Err(ListError::InvalidArgument("missing string length".into()));
    }
    let len = buf.get_u16() as usize;
    if buf.remaining() < len {
        return Err(ListError::InvalidArgument("string runs past record".into()));
    }
    let s = String::from_utf8(buf[..len].to_vec())
        .map_err(|e| ListError::InvalidArgument(e.to_string()))?;
    buf.advance(len);
    Ok(s)
}

fn serialize(r: &Restaurant) -> Bytes {
    let mut buf = BytesMut::with_capacity(16 + r.name.len() + r.food_type.len());
    buf.put_u32(r.id);
    buf.put_f32(r.latitude);
    buf.put_f32(r.longitude);
    put_str(&mut buf, &r.name);
    put_str(&mut buf, &r.food_type);
    buf.freeze()
}

fn unserialize(raw: &[u8]) -> Result<(Restaurant, usize), ListError> {
    let mut buf = raw;
    if buf.remaining() < 12 {
        return Err(ListError::InvalidArgument("record too short".into()));
    }
    let id = buf.get_u32();
    let latitude = buf.get_f32();
    let longitude = buf.get_f32();
    let name = get_str(&mut buf)?;
    let food_type = get_str(&mut buf)?;
    let memory = std::mem::size_of::<Restaurant>() + name.len() + food_type.len();
    Ok((
        Restaurant {
            id,
            latitude,
            longitude,
            name,
            food_type,
        },
        memory,
    ))
}

fn restaurant_list() -> List<Restaurant, Lookup> {
    let mut list = List::new();
    list.set_comparator(|a: &Restaurant, b: &Restaurant| distance_sq(a).total_cmp(&distance_sq(b)));
    list.set_seeker(|r: &Restaurant, lookup: &Lookup| match lookup {
        Lookup::Id(id) => r.id == *id,
        Lookup::FoodType(kind) => r.food_type.eq_ignore_ascii_case(kind),
    });
    list.set_serializer(serialize);
    list.set_unserializer(unserialize);
    list
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Chainlist Record Store Example\n");

    let mut list = restaurant_list();
    let seed = [
        (1, 38.7101, -9.1432, "Tasca do Chico", "Portuguese"),
        (2, 38.7369, -9.1427, "Sushi Marvila", "Japanese"),
        (3, 38.7223, -9.1390, "Cantinho", "Portuguese"),
        (4, 38.6979, -9.2063, "Pasteis de Belem", "Bakery"),
    ];
    for (id, latitude, longitude, name, food_type) in seed {
        list.append(Restaurant {
            id,
            latitude,
            longitude,
            name: name.to_string(),
            food_type: food_type.to_string(),
        })?;
    }

    list.sort(Direction::Ascending)?;
    println!("Nearest first:");
    for r in &list {
        println!("  {:>3} {:<20} {}", r.id, r.name, r.food_type);
    }

    if let Some(r) = list.seek(&Lookup::FoodType("japanese"))? {
        println!("\nFirst Japanese place: {}", r.name);
    }
    if let Some(pos) = list.seek_position(&Lookup::Id(4))? {
        let closed = list.delete_at(pos)?;
        println!("Removed {} (closed for vacation)", closed.name);
    }

    let path = std::env::temp_dir().join("restaurants.chl");
    let written = list.dump_to_file(&path)?;
    println!("\nWrote {} payload bytes to {}", written, path.display());

    let mut reloaded = restaurant_list();
    reloaded.restore_from_file(&path)?;
    println!("Reloaded {} restaurants, median: {:?}", reloaded.len(), reloaded.mid().map(|r| &r.name));

    std::fs::remove_file(&path)?;
    Ok(())
}
