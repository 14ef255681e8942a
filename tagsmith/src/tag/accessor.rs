use crate::picture::Picture;

use std::borrow::Cow;

#[cfg(doc)]
use crate::tag::{CombinedTag, TagExt};

// This defines the `Accessor` trait, used to define unified getters/setters for commonly
// accessed tag values, along with the `TagProperty` enum naming each of them.
//
// Usage:
//
// accessor_trait! {
//     [field_name]<type>
// }
//
// * `field_name` is the name of the method to access the field. If a name consists of multiple segments,
// such as `track_number`, they should be separated by spaces like so: [track number]<type>.
// The `TagProperty` variant is the camel case form of the segments, `TrackNumber`.
//
// * `type` is the return type for `Accessor::field_name`. By default, this type will also be used
// in the setter.
//
// An owned type can also be specified for the setter:
//
// accessor_trait! {
//     field_name<type, owned_type>
// }
macro_rules! accessor_trait {
	($([$name:tt $($other:tt)*] < $($ty:ty),+ >),+ $(,)?) => {
		/// Provides accessors for common items
		///
		/// Every method has a no-op default, so a tag only implements the properties it can store.
		/// Whether a tag stores a property is reported through [`TagExt::supports`].
		///
		/// Note that for tag formats supporting multiple values, the behavior of any setter methods is
		/// to **overwrite**, not append. If multi-value support is needed, consider using the format-specific methods.
		pub trait Accessor {
			$(
				accessor_trait! { @GETTER [$name $($other)*] $($ty),+ }

				accessor_trait! { @SETTER [$name $($other)*] $($ty),+ }

				accessor_trait! { @REMOVE [$name $($other)*] $($ty),+ }
			)+
		}

		paste::paste! {
			/// A property exposed through [`Accessor`]
			///
			/// Used by [`CombinedTag`] to decide which tags receive a write.
			#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
			#[non_exhaustive]
			pub enum TagProperty {
				$(
					#[doc = "The " $name $(" " $other)* " property"]
					[<$name:camel $($other:camel)*>],
				)+
			}
		}
	};
	(@GETTER [$($name:tt)+] $ty:ty $(, $_ty:tt)?) => {
		accessor_trait! { @GET_METHOD [$($name)+] Option<$ty> }
	};
	(@SETTER [$($name:tt)+] $_ty:ty, $owned_ty:tt) => {
		accessor_trait! { @SETTER [$($name)+] $owned_ty }
	};
	(@SETTER [$($name:tt)+] $ty:ty) => {
		accessor_trait! { @SET_METHOD  [$($name)+] $ty }
	};
	(@REMOVE [$($name:tt)+] $_ty:ty, $owned_ty:tt) => {
		accessor_trait! { @REMOVE [$($name)+] $owned_ty }
	};
	(@REMOVE [$($name:tt)+] $ty:ty) => {
		accessor_trait! { @REMOVE_METHOD [$($name)+], $ty }
	};
	(@GET_METHOD [$name:tt $($other:tt)*] Option<$ret_ty:ty>) => {
		paste::paste! {
			#[doc = "Returns the " $name $(" " $other)* "."]
			///
			/// For formats that support multiple definitions of the same item, this will only return the first occurrence.
			///
			/// # Example
			///
			/// ```rust
			/// use tagsmith::ape::ApeTag;
			/// use tagsmith::tag::Accessor;
			///
			/// let tag = ApeTag::new();
			#[doc = "assert!(tag." $name $(_ $other)* "().is_none());"]
			/// ```
			fn [<
				$name $(_ $other)*
			>] (&self) -> Option<$ret_ty> { None }
		}
	};
	(@SET_METHOD [$name:tt $($other:tt)*] $owned_ty:ty) => {
		paste::paste! {
			#[doc = "Sets the " $name $(" " $other)* "."]
			///
			/// For formats that support multiple definitions of the same item, this will remove **all**
			/// existing values, and replace them with `value`.
			///
			/// # Example
			///
			/// ```rust,ignore
			/// use tagsmith::tag::Accessor;
			///
			#[doc = "tag.set_" $name $(_ $other)* "(value);"]
			///
			#[doc = "assert_eq!(tag." $name $(_ $other)* "(), Some(value));"]
			/// ```
			fn [<
				set_ $name $(_ $other)*
			>] (&mut self , _value: $owned_ty) {}
		}
	};
	(@REMOVE_METHOD [$name:tt $($other:tt)*], $ty:ty) => {
		paste::paste! {
			#[doc = "Removes the " $name $(" " $other)*]
			/// # Example
			///
			/// ```rust,ignore
			/// use tagsmith::tag::Accessor;
			///
			#[doc = "tag.set_" $name $(_ $other)* "(value);"]
			///
			#[doc = "assert_eq!(tag." $name $(_ $other)* "(), Some(value));"]
			///
			#[doc = "tag.remove_" $name $(_ $other)* "();"]
			///
			#[doc = "assert_eq!(tag." $name $(_ $other)* "(), None);"]
			/// ```
			fn [<
				remove_ $name $(_ $other)*
			>] (&mut self) {}
		}
	};
}

accessor_trait! {
	[title        ]<Cow<'_, str>, String>, [album           ]<Cow<'_, str>, String>,
	[comment      ]<Cow<'_, str>, String>, [copyright       ]<Cow<'_, str>, String>,
	[conductor    ]<Cow<'_, str>, String>, [grouping        ]<Cow<'_, str>, String>,
	[lyrics       ]<Cow<'_, str>, String>, [creator         ]<Cow<'_, str>, String>,
	[software     ]<Cow<'_, str>, String>, [make            ]<Cow<'_, str>, String>,
	[model        ]<Cow<'_, str>, String>, [date time       ]<Cow<'_, str>, String>,
	[performers   ]<Vec<String>>,          [album artists   ]<Vec<String>>,
	[composers    ]<Vec<String>>,          [genres          ]<Vec<String>>,
	[keywords     ]<Vec<String>>,          [pictures        ]<Vec<Picture>>,
	[track        ]<u32>,                  [track total     ]<u32>,
	[disk         ]<u32>,                  [disk total      ]<u32>,
	[year         ]<u32>,                  [beats per minute]<u32>,
	[rating       ]<u32>,                  [iso speed       ]<u32>,
	[orientation  ]<u16>,                  [exposure time   ]<f64>,
	[f number     ]<f64>,                  [focal length    ]<f64>,
}
