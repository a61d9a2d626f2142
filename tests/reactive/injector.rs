use lazy_link::Injector ;

struct Theme( &'static str );
struct Locale( &'static str );

#[test]
fn lookups_fall_through_to_the_parent() {

	let root = Injector::root().provide( Theme( "light" ));
	let child = root.child().named( "FeatureModule" ).provide( Locale( "de" ));

	assert_eq!( child.get::<Theme>().map(| theme | theme.0 ), Some( "light" ));
	assert_eq!( child.get::<Locale>().map(| locale | locale.0 ), Some( "de" ));
	assert!( root.get::<Locale>().is_none() );
	assert_eq!( child.name(), Some( "FeatureModule" ));
	assert!( child.parent().is_some_and(| parent | parent.ptr_eq( &root )));

}

#[test]
fn children_shadow_parent_services() {

	let root = Injector::root().provide( Theme( "light" ));
	let child = root.child().provide( Theme( "dark" ));

	assert_eq!( child.get::<Theme>().map(| theme | theme.0 ), Some( "dark" ));
	assert_eq!( root.get::<Theme>().map(| theme | theme.0 ), Some( "light" ));

}

#[test]
fn providing_on_a_shared_handle_leaves_other_handles_untouched() {

	let original = Injector::root().provide( Theme( "light" ));
	let shared = original.clone();
	let extended = shared.provide( Locale( "fr" ));

	assert!( original.get::<Locale>().is_none() );
	assert_eq!( extended.get::<Theme>().map(| theme | theme.0 ), Some( "light" ));
	assert_eq!( extended.get::<Locale>().map(| locale | locale.0 ), Some( "fr" ));

}
