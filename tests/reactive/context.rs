use std::collections::HashMap ;
use lazy_link::{ Context, ContextValue, Value };

#[test]
fn entries_keep_their_kind() {

	let context = Context::new()
		.with_input( "title", "Hello" )
		.with_input( "count", 3 )
		.with_handler( "on_save", | _ | {} );

	assert_eq!( context.get( "title" ).and_then( ContextValue::as_data ), Some( &Value::from( "Hello" )));
	assert_eq!( context.get( "count" ).and_then( ContextValue::as_data ).and_then( Value::as_int ), Some( 3 ));
	assert!( context.get( "on_save" ).and_then( ContextValue::as_handler ).is_some() );
	assert!( context.get( "on_save" ).and_then( ContextValue::as_data ).is_none() );
	assert_eq!( context.names().collect::<Vec<_>>(), vec![ "count", "on_save", "title" ]);

}

#[test]
fn insert_replaces_and_returns_the_previous_entry() {

	let mut context: Context = [( "a", 1 ), ( "b", 2 )].into_iter().collect();
	let previous = context.insert( "a", Value::Null );

	assert!( matches!( previous, Some( ContextValue::Data( Value::Int( 1 )))));
	assert!( context.get( "a" ).and_then( ContextValue::as_data ).is_some_and( Value::is_null ));
	assert_eq!( context.len(), 2 );
	assert!( !context.is_empty() );
	assert!( context.contains( "b" ));

}

#[test]
fn values_display_compactly() {

	let map = Value::Map( HashMap::from([
		( "b".to_string(), Value::List( vec![ Value::from( true ), Value::Null ])),
		( "a".to_string(), Value::from( 1.5 )),
	]));

	assert_eq!( map.to_string(), "{a: 1.5, b: [true, null]}" );
	assert_eq!( Value::from( vec![ "x", "y" ]).to_string(), "[\"x\", \"y\"]" );

}
