mod day_record;
mod diet;
mod grocery;
mod meal;
mod meal_slot;

pub use day_record::DayRecord;
pub use diet::DietPreference;
pub use grocery::{GroceryItem, GroceryList};
pub use meal::Meal;
pub use meal_slot::MealSlot;
